//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::{AppError, AppResult, SERVICE_NAME};
use crate::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub service: String,
    pub status: String,
    pub configured: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    // Field casing kept for deployed probes that match on it
    #[serde(rename = "Backend")]
    pub backend: String,
}

/// Root endpoint: always 200, reports whether the relay is configured
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: SERVICE_NAME.to_string(),
        status: "healthy".to_string(),
        configured: state.config.smtp.is_configured(),
    })
}

/// Deployment health check: 503 until relay credentials are configured,
/// independent of weather-provider reachability
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    if !state.config.smtp.is_configured() {
        return Err(AppError::Configuration(
            "Email credentials not configured".to_string(),
        ));
    }

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        backend: "Online".to_string(),
    }))
}
