//! Configuration management for the TropoMetrics service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TROPO_ prefix
//!
//! The legacy `EMAIL_USERNAME` / `EMAIL_PASSWORD` / `EMAIL_SERVER` variables
//! injected by the deployment secrets are honored as SMTP overrides.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Outbound mail relay configuration
    pub smtp: SmtpConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// API-key allow-list configuration
    pub auth: AuthConfig,

    /// Route-group toggles
    pub features: FeatureConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpConfig {
    /// Relay address as "host:port"
    pub server: String,

    /// Relay account username, also used as the From address
    pub username: Option<String>,

    /// Relay account password
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint base URL
    pub base_url: String,

    /// Fixed coordinate the service reports on
    pub latitude: f64,
    pub longitude: f64,

    /// Timezone passed through to the provider
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Accepted API keys for the weather endpoint
    pub api_keys: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeatureConfig {
    /// Serve the weather route group
    pub weather: bool,

    /// Serve the email route group
    pub email: bool,
}

impl SmtpConfig {
    /// Relay hostname from the "host:port" server string.
    pub fn host(&self) -> &str {
        match self.server.rsplit_once(':') {
            Some((host, _)) => host,
            None => &self.server,
        }
    }

    /// Relay port, falling back to the submission port when unparsable.
    pub fn port(&self) -> u16 {
        self.server
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
            .unwrap_or(587)
    }

    /// Whether both relay credentials are present.
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.username) && set(&self.password)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("TROPO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("smtp.server", "smtp.gmail.com:587")?
            .set_default("weather.base_url", "https://api.open-meteo.com/v1/forecast")?
            .set_default("weather.latitude", -5.013)?
            .set_default("weather.longitude", -58.381)?
            .set_default("weather.timezone", "Europe/Amsterdam")?
            .set_default("auth.api_keys", vec!["demo".to_string()])?
            .set_default("features.weather", true)?
            .set_default("features.email", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TROPO_ prefix)
            .add_source(
                Environment::with_prefix("TROPO")
                    .separator("__")
                    .try_parsing(true),
            );

        // Secrets arrive under their legacy deployment names
        if let Ok(username) = std::env::var("EMAIL_USERNAME") {
            builder = builder.set_override("smtp.username", username)?;
        }
        if let Ok(password) = std::env::var("EMAIL_PASSWORD") {
            builder = builder.set_override("smtp.password", password)?;
        }
        if let Ok(server) = std::env::var("EMAIL_SERVER") {
            builder = builder.set_override("smtp.server", server)?;
        }

        builder.build()?.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp(server: &str) -> SmtpConfig {
        SmtpConfig {
            server: server.to_string(),
            username: None,
            password: None,
        }
    }

    #[test]
    fn smtp_server_string_splits_into_host_and_port() {
        let cfg = smtp("smtp.example.com:2525");
        assert_eq!(cfg.host(), "smtp.example.com");
        assert_eq!(cfg.port(), 2525);
    }

    #[test]
    fn smtp_port_defaults_to_submission_port() {
        assert_eq!(smtp("smtp.example.com").port(), 587);
        assert_eq!(smtp("smtp.example.com:garbage").port(), 587);
        assert_eq!(smtp("smtp.example.com").host(), "smtp.example.com");
    }

    /// The listener binds the configured host, so the default must parse
    #[test]
    fn default_server_host_is_a_bindable_address() {
        let server = ServerConfig::default();
        assert!(server.host.parse::<std::net::IpAddr>().is_ok());
        assert_eq!(server.port, 8000);
    }

    #[test]
    fn smtp_configured_requires_both_credentials() {
        let mut cfg = smtp("smtp.example.com:587");
        assert!(!cfg.is_configured());

        cfg.username = Some("mailer@example.com".into());
        assert!(!cfg.is_configured());

        cfg.password = Some("hunter2".into());
        assert!(cfg.is_configured());

        cfg.password = Some(String::new());
        assert!(!cfg.is_configured());
    }
}
