//! Route definitions for the TropoMetrics service
//!
//! The weather and email capabilities are independent route groups toggled
//! by configuration; one parameterized service serves any combination.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{config::FeatureConfig, handlers, AppState};

/// Create the routes enabled by the feature toggles
pub fn api_routes(features: &FeatureConfig) -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check));

    if features.weather {
        router = router.merge(weather_routes());
    }
    if features.email {
        router = router.merge(email_routes());
    }

    router
}

/// Weather route group
fn weather_routes() -> Router<AppState> {
    Router::new().route("/api", get(handlers::weather_report))
}

/// Email route group
fn email_routes() -> Router<AppState> {
    Router::new().route("/api/send-email", post(handlers::send_email))
}
