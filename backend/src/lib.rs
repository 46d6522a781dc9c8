//! TropoMetrics service library
//!
//! An HTTP service with two capabilities: relaying one email per request
//! through an authenticated SMTP relay, and serving a derived weather report
//! built from one Open-Meteo forecast fetch per request.

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

/// Fallback tracing directive when RUST_LOG is unset; covers the library
/// target as well as the binary so handler errors are not filtered out
pub const DEFAULT_LOG_FILTER: &str = "tropo_server=debug,tropometrics_backend=debug,tower_http=debug";

use crate::external::WeatherClient;
use crate::services::auth::{KeyValidator, StaticKeyValidator};
use crate::services::Mailer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherClient,
    pub mailer: Option<Mailer>,
    pub keys: Arc<dyn KeyValidator>,
}

impl AppState {
    /// Build the state from configuration: weather client pointed at the
    /// configured provider, mailer only when relay credentials are present,
    /// key gate over the configured allow-list.
    pub fn from_config(config: Config) -> error::AppResult<Self> {
        let weather = WeatherClient::with_base_url(config.weather.base_url.clone());
        let mailer = Mailer::from_config(&config.smtp)?;
        let keys = Arc::new(StaticKeyValidator::from_config(&config.auth));

        Ok(Self {
            config: Arc::new(config),
            weather,
            mailer,
            keys,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_routes(&state.config.features)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Library tracing events must pass the fallback filter, not just the
    /// binary's
    #[test]
    fn default_log_filter_covers_library_target() {
        assert!(DEFAULT_LOG_FILTER.contains("tropometrics_backend=debug"));
        assert!(DEFAULT_LOG_FILTER.contains("tropo_server=debug"));
    }
}
