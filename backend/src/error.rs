//! Error handling for the TropoMetrics service
//!
//! Every failure is request-scoped and maps onto one HTTP response; nothing
//! is retried. Weather-route authorization failures render the themed HTML
//! error page, everything else renders the JSON error envelope.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

/// Service name reported in error envelopes and report metadata
pub const SERVICE_NAME: &str = "TropoMetrics Weather API";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Missing static configuration, e.g. relay credentials
    #[error("Configuration error: {0}")]
    Configuration(String),

    // API-key gate: the two cases differ only in the message
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    // Weather provider unreachable or non-2xx
    #[error("Failed to fetch weather data: {0}")]
    UpstreamFetch(String),

    // Mail relay rejected the static credentials
    #[error("Email authentication failed")]
    RelayAuth,

    // Any other relay-protocol failure
    #[error("Failed to send email: {0}")]
    RelayTransport(String),

    // Request body failed schema validation
    #[error("Validation error: {0}")]
    Validation(String),

    // Anything uncaught; detail is logged, never returned
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// JSON error envelope returned by non-HTML failure paths
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
    pub timestamp: String,
    pub service: String,
}

impl ErrorBody {
    fn new(message: String) -> Self {
        Self {
            error: true,
            message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            service: SERVICE_NAME.to_string(),
        }
    }
}

/// Themed HTML page wrapping a JSON error document, used by the API-key gate
fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{SERVICE_NAME}</title>
    <style>
        body {{ font-family: 'Monaco', monospace; background: #1e1e1e; color: #d4d4d4; padding: 20px; }}
        pre {{ background: #252526; padding: 20px; border-radius: 8px; border: 1px solid #3e3e42; }}
        .error {{ color: #f48771; }}
    </style>
</head>
<body>
    <pre class="error">{{
  "error": true,
  "status": {status},
  "message": "{message}",
  "timestamp": "{timestamp}",
  "service": "{SERVICE_NAME}"
}}</pre>
</body>
</html>
"#,
        status = status.as_u16(),
        message = message,
        timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        match &self {
            AppError::MissingApiKey => {
                let body = error_page(
                    StatusCode::UNAUTHORIZED,
                    "Missing API key. Use: /api?api_key=YOUR_API_KEY",
                );
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    body,
                )
                    .into_response()
            }
            AppError::InvalidApiKey => {
                let body = error_page(StatusCode::UNAUTHORIZED, "Invalid API key");
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    body,
                )
                    .into_response()
            }
            AppError::Configuration(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody::new(message.clone())),
            )
                .into_response(),
            AppError::UpstreamFetch(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody::new(format!(
                    "Failed to fetch weather data: {detail}"
                ))),
            )
                .into_response(),
            AppError::RelayAuth => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::new(
                    "Email authentication failed. Check credentials.".to_string(),
                )),
            )
                .into_response(),
            AppError::RelayTransport(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(format!("Failed to send email: {detail}"))),
            )
                .into_response(),
            AppError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody::new(message.clone())),
            )
                .into_response(),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Internal server error".to_string())),
            )
                .into_response(),
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
