//! Weather API client for fetching forecast data
//!
//! Integrates with the Open-Meteo forecast API. One fetch per request, no
//! caching and no retry; failures surface as upstream errors.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

/// Full forecast payload as returned by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub current: CurrentBlock,
    pub daily: DailyBlock,
    pub hourly: HourlyBlock,
}

/// Current conditions block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentBlock {
    pub time: String,
    pub temperature_2m: f64,
}

/// Daily series block; passed through verbatim in `raw_data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub daylight_duration: Vec<f64>,
}

/// Hourly series block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyBlock {
    pub precipitation: Vec<f64>,
    pub relative_humidity_2m: Vec<f64>,
    pub soil_moisture_27_to_81cm: Vec<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new() -> Self {
        Self::with_base_url("https://api.open-meteo.com/v1/forecast".to_string())
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the forecast for the configured coordinate.
    ///
    /// Requests the exact variable set the derivation needs: daily min/max
    /// temperature and daylight duration, hourly precipitation, humidity and
    /// soil moisture, plus the current temperature.
    pub async fn fetch_forecast(&self, config: &WeatherConfig) -> AppResult<ForecastPayload> {
        let url = format!(
            "{}?latitude={}&longitude={}\
             &daily=temperature_2m_max,temperature_2m_min,daylight_duration\
             &hourly=precipitation,relative_humidity_2m,soil_moisture_27_to_81cm\
             &current=temperature_2m&timezone={}",
            self.base_url,
            config.latitude,
            config.longitude,
            urlencode(&config.timezone),
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Weather API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFetch(format!(
                "Weather API error: {status} - {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Failed to parse weather response: {e}")))
    }
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal percent-encoding for the timezone query value ("Europe/Amsterdam")
fn urlencode(value: &str) -> String {
    value.replace('/', "%2F")
}
