//! API-key gate for the weather endpoint
//!
//! Key validation is a pluggable capability so handlers can be tested with
//! fake validators and deployments can back it with a secret store. The
//! default implementation is a static allow-list from configuration.

use crate::config::AuthConfig;

/// Decides whether an opaque key grants access
pub trait KeyValidator: Send + Sync {
    fn is_authorized(&self, key: &str) -> bool;
}

/// Allow-list validator over the configured keys
#[derive(Debug, Clone)]
pub struct StaticKeyValidator {
    keys: Vec<String>,
}

impl StaticKeyValidator {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.api_keys.clone())
    }
}

impl KeyValidator for StaticKeyValidator {
    fn is_authorized(&self, key: &str) -> bool {
        !key.is_empty() && self.keys.iter().any(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_known_keys_only() {
        let validator = StaticKeyValidator::new(vec!["demo".into(), "test".into()]);
        assert!(validator.is_authorized("demo"));
        assert!(validator.is_authorized("test"));
        assert!(!validator.is_authorized("wrong"));
        assert!(!validator.is_authorized(""));
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        let validator = StaticKeyValidator::new(Vec::new());
        assert!(!validator.is_authorized("demo"));
    }
}
