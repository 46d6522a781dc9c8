//! Weather report derivation
//!
//! Pure functions from one upstream forecast payload plus the request's
//! arrival time to the derived report: unit conversions, daylight formatting,
//! soil-moisture-based irrigation advice and 6-hour precipitation buckets.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult, SERVICE_NAME};
use crate::external::weather::{DailyBlock, ForecastPayload};

/// Soil-moisture fraction at or below which irrigation is advised
pub const IRRIGATION_THRESHOLD: f64 = 0.14;

/// Hours per precipitation bucket
const BUCKET_HOURS: usize = 6;

/// Length of the forecast window in hourly samples (5 days)
const FORECAST_WINDOW_HOURS: usize = 120;

/// Derived report returned by the weather endpoint
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub metadata: Metadata,
    pub current: CurrentSection,
    pub daily: DailySection,
    pub moisture: MoistureSection,
    pub irrigation: IrrigationSection,
    pub forecast: ForecastSection,
    pub raw_data: RawData,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub location: Location,
    pub source: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentSection {
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySection {
    pub temperature_min_celsius: f64,
    pub temperature_max_celsius: f64,
    pub daylight_duration_seconds: f64,
    pub daylight_hours: i64,
    pub daylight_minutes: i64,
    pub daylight_formatted: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoistureSection {
    pub soil_moisture_27_to_81cm_percentage: f64,
    pub soil_moisture_raw: f64,
    pub relative_humidity_percentage: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IrrigationSection {
    pub advice: String,
    pub advice_english: String,
    pub needs_water: bool,
    pub threshold: f64,
    pub current_level: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastSection {
    pub precipitation_5day: Vec<PrecipBucket>,
    pub total_precipitation_mm: f64,
    pub forecast_periods: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipBucket {
    pub period_hours: u32,
    pub precipitation_mm: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawData {
    pub note: String,
    pub daily: DailyBlock,
    pub hourly_sample: HourlySample,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlySample {
    pub precipitation_first_24h: Vec<f64>,
    pub relative_humidity_first_24h: Vec<f64>,
    pub soil_moisture_first_24h: Vec<f64>,
}

/// Round to 1 decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Celsius to Fahrenheit, rounded to 1 decimal
pub fn fahrenheit(celsius: f64) -> f64 {
    round1(celsius * 9.0 / 5.0 + 32.0)
}

/// Split a daylight duration in seconds into whole hours and minutes.
///
/// Floor/modulo semantics: 3661s is 1h 1m, 3599s is 0h 59m.
pub fn daylight_hours_minutes(duration_seconds: f64) -> (i64, i64) {
    let seconds = duration_seconds as i64;
    (seconds / 3600, (seconds % 3600) / 60)
}

/// Format a daylight duration as "<H>h <M>m"
pub fn format_daylight(duration_seconds: f64) -> String {
    let (hours, minutes) = daylight_hours_minutes(duration_seconds);
    format!("{hours}h {minutes}m")
}

/// Whether the soil-moisture fraction calls for irrigation
pub fn needs_water(soil_moisture: f64) -> bool {
    soil_moisture <= IRRIGATION_THRESHOLD
}

/// Dutch/English advice pair for a soil-moisture fraction
pub fn irrigation_advice(soil_moisture: f64) -> (&'static str, &'static str) {
    if needs_water(soil_moisture) {
        ("Geef water", "Give water")
    } else {
        ("Water geven is nu niet nodig", "Watering not needed now")
    }
}

/// Aggregate an hourly precipitation series into 6-hour buckets.
///
/// The window opens at the current hour-of-day floored to a multiple of 6 and
/// spans 5 days of hourly samples, capped to the available series. Each sixth
/// sample closes a bucket; a trailing window shorter than 6 samples is
/// dropped. Returns the buckets and their rounded total.
pub fn bucket_precipitation(series: &[f64], hour_of_day: u32) -> (Vec<PrecipBucket>, f64) {
    let start = (hour_of_day as usize - hour_of_day as usize % BUCKET_HOURS).min(series.len());
    let end = (start + FORECAST_WINDOW_HOURS).min(series.len());

    let mut buckets = Vec::new();
    let mut amount = 0.0;
    for (consumed, value) in series[start..end].iter().enumerate() {
        amount += value;
        if (consumed + 1) % BUCKET_HOURS == 0 {
            buckets.push(PrecipBucket {
                period_hours: BUCKET_HOURS as u32,
                precipitation_mm: round2(amount),
            });
            amount = 0.0;
        }
    }

    let total = round2(buckets.iter().map(|b| b.precipitation_mm).sum());
    (buckets, total)
}

/// Derive the full report from one upstream payload.
///
/// Deterministic in the payload and `now`; no partial report is ever
/// produced — an incomplete payload is an upstream failure.
pub fn derive_report(
    payload: &ForecastPayload,
    now: DateTime<Utc>,
    config: &WeatherConfig,
) -> AppResult<WeatherReport> {
    let daylight_seconds = *payload
        .daily
        .daylight_duration
        .first()
        .ok_or_else(incomplete)?;
    let soil_moisture = *payload
        .hourly
        .soil_moisture_27_to_81cm
        .first()
        .ok_or_else(incomplete)?;
    let humidity = *payload
        .hourly
        .relative_humidity_2m
        .first()
        .ok_or_else(incomplete)?;

    let temperature_min = fold_min(&payload.daily.temperature_2m_min).ok_or_else(incomplete)?;
    let temperature_max = fold_max(&payload.daily.temperature_2m_max).ok_or_else(incomplete)?;

    let (daylight_hours, daylight_minutes) = daylight_hours_minutes(daylight_seconds);
    let (advice, advice_english) = irrigation_advice(soil_moisture);
    let (buckets, total_precipitation) =
        bucket_precipitation(&payload.hourly.precipitation, now.hour());

    let timestamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);

    Ok(WeatherReport {
        metadata: Metadata {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: timestamp.clone(),
            location: Location {
                latitude: config.latitude,
                longitude: config.longitude,
                timezone: config.timezone.clone(),
            },
            source: "Open-Meteo API".to_string(),
            endpoint: "/api".to_string(),
        },
        current: CurrentSection {
            temperature_celsius: payload.current.temperature_2m,
            temperature_fahrenheit: fahrenheit(payload.current.temperature_2m),
            timestamp: payload.current.time.clone(),
        },
        daily: DailySection {
            temperature_min_celsius: temperature_min,
            temperature_max_celsius: temperature_max,
            daylight_duration_seconds: daylight_seconds,
            daylight_hours,
            daylight_minutes,
            daylight_formatted: format_daylight(daylight_seconds),
        },
        moisture: MoistureSection {
            soil_moisture_27_to_81cm_percentage: round2(soil_moisture * 100.0),
            soil_moisture_raw: soil_moisture,
            relative_humidity_percentage: humidity,
            timestamp,
        },
        irrigation: IrrigationSection {
            advice: advice.to_string(),
            advice_english: advice_english.to_string(),
            needs_water: needs_water(soil_moisture),
            threshold: IRRIGATION_THRESHOLD,
            current_level: soil_moisture,
        },
        forecast: ForecastSection {
            forecast_periods: buckets.len(),
            precipitation_5day: buckets,
            total_precipitation_mm: total_precipitation,
        },
        raw_data: RawData {
            note: "Full hourly and daily data from Open-Meteo API".to_string(),
            daily: payload.daily.clone(),
            hourly_sample: HourlySample {
                precipitation_first_24h: first_24h(&payload.hourly.precipitation),
                relative_humidity_first_24h: first_24h(&payload.hourly.relative_humidity_2m),
                soil_moisture_first_24h: first_24h(&payload.hourly.soil_moisture_27_to_81cm),
            },
        },
    })
}

fn incomplete() -> AppError {
    AppError::UpstreamFetch("Weather API returned an incomplete payload".to_string())
}

fn fold_min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn fold_max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn first_24h(series: &[f64]) -> Vec<f64> {
    series[..series.len().min(24)].to_vec()
}
