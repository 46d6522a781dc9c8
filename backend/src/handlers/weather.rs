//! HTTP handler for the weather report endpoint
//!
//! Gate on the API key, fetch one forecast from the provider, derive the
//! report and return it as an HTML page embedding the JSON document.

use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, AppResult, SERVICE_NAME};
use crate::services::auth::KeyValidator;
use crate::services::report::{derive_report, WeatherReport};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: Option<String>,
}

/// GET /api?api_key=<key>
pub async fn weather_report(
    State(state): State<AppState>,
    Query(query): Query<ApiKeyQuery>,
) -> AppResult<Html<String>> {
    let key = query.api_key.unwrap_or_default();
    if key.is_empty() {
        return Err(AppError::MissingApiKey);
    }
    if !state.keys.is_authorized(&key) {
        return Err(AppError::InvalidApiKey);
    }

    let payload = state.weather.fetch_forecast(&state.config.weather).await?;
    let report = derive_report(&payload, Utc::now(), &state.config.weather)?;

    Ok(Html(render_report_page(&report)?))
}

/// Wrap the pretty-printed report JSON in the themed HTML page
fn render_report_page(report: &WeatherReport) -> AppResult<String> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {e}")))?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{SERVICE_NAME}</title>
    <style>
        body {{ font-family: 'Monaco', monospace; background: #1e1e1e; color: #d4d4d4; padding: 20px; }}
        pre {{ background: #252526; padding: 20px; border-radius: 8px; border: 1px solid #3e3e42; overflow-x: auto; }}
        .header {{ color: #4ec9b0; margin-bottom: 20px; padding: 10px; background: #252526; border-radius: 8px; border-left: 4px solid #4ec9b0; }}
    </style>
</head>
<body>
    <div class="header">
        <h2>🌾 TropoMetrics Weather Data API</h2>
        <p>Real-time weather data for agricultural sector</p>
    </div>
    <pre>{json}</pre>
</body>
</html>
"#
    ))
}
