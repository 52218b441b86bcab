//! Open-Meteo forecast API client
//!
//! This module fetches the raw forecast payload used by the night-observation
//! pipeline and turns its parallel hourly arrays into `HourlyRecord` values.
//! Timestamps arrive as location-local ISO strings without an offset
//! (`timezone=auto`), so everything here works in naive local time.

use chrono::{NaiveDateTime, Timelike};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::HourlyRecord;

/// Base URL for the Open-Meteo forecast API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Fields requested in the `current` block
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,cloud_cover,wind_speed_10m,wind_direction_10m,precipitation_probability,dew_point_2m";

/// Fields requested as hourly series, in upstream order
const HOURLY_FIELDS: &str = "precipitation_probability,dew_point_2m,temperature_2m,relative_humidity_2m,cloud_cover,cloud_cover_low,cloud_cover_mid,cloud_cover_high,wind_speed_10m,wind_direction_10m";

/// Number of forecast days to request
const FORECAST_DAYS: u8 = 7;

/// Upstream weather model selector
const WEATHER_MODEL: &str = "best_match";

/// Errors that can occur when fetching or interpreting forecast data
#[derive(Debug, Error)]
pub enum ForecastError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {status}")]
    Upstream { status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// A parallel hourly array is shorter than the time array
    #[error("Hourly series {field} has {actual} entries, expected at least {expected}")]
    InconsistentSeries {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Raw forecast payload as returned by Open-Meteo
///
/// Blocks are optional so a partial payload still deserializes; validation of
/// the parts the pipeline needs happens separately. This struct is also what
/// the cache persists, so it round-trips through serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPayload {
    /// Current conditions block
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    /// Daily series block (sunrise/sunset)
    #[serde(default)]
    pub daily: Option<DailyBlock>,
    /// Hourly series block
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
}

/// Current conditions as reported by the upstream `current` block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default)]
    pub cloud_cover: Option<f64>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    #[serde(default)]
    pub wind_direction_10m: Option<f64>,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
    #[serde(default)]
    pub dew_point_2m: Option<f64>,
}

/// Daily series block carrying sunrise and sunset timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub sunrise: Option<Vec<String>>,
    #[serde(default)]
    pub sunset: Option<Vec<String>>,
}

/// Hourly series block: a time array plus parallel numeric arrays
///
/// Numeric entries are nullable; an hour the model did not produce shows up
/// as `null` upstream and `None` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub dew_point_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover_low: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover_mid: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover_high: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_direction_10m: Vec<Option<f64>>,
}

/// Sunrise and sunset series parsed into naive local datetimes
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub sunrise: Vec<NaiveDateTime>,
    pub sunset: Vec<NaiveDateTime>,
}

/// Client for fetching forecast data from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    /// Create a new ForecastClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: OPEN_METEO_BASE_URL.to_string(),
        }
    }

    /// Create a client pointed at a different base URL (for tests)
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the raw forecast payload for the given coordinates
    ///
    /// Issues a single GET with the fixed parameter set (current, hourly and
    /// daily field lists, `timezone=auto`, 7 forecast days, best-match
    /// model). No retries.
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    ///
    /// # Returns
    /// * `Ok(ForecastPayload)` - The parsed payload (not yet validated)
    /// * `Err(ForecastError)` - On transport failure, non-success status, or
    ///   a body that is not valid JSON
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastPayload, ForecastError> {
        let url = format!(
            "{}?latitude={}&longitude={}&current={}&hourly={}&daily=sunrise,sunset&timezone=auto&forecast_days={}&models={}",
            self.base_url, lat, lon, CURRENT_FIELDS, HOURLY_FIELDS, FORECAST_DAYS, WEATHER_MODEL
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let payload: ForecastPayload = serde_json::from_str(&text)?;
        Ok(payload)
    }
}

/// Checks that the payload carries the parts the pipeline cannot run without
///
/// Presence of `daily.sunset` is what is required; an empty array still
/// passes here and fails later, at window derivation.
pub fn validate_payload(payload: &ForecastPayload) -> Result<(), ForecastError> {
    payload
        .daily
        .as_ref()
        .ok_or_else(|| ForecastError::MissingField("daily".to_string()))?
        .sunset
        .as_ref()
        .ok_or_else(|| ForecastError::MissingField("daily.sunset".to_string()))?;
    Ok(())
}

/// Builds the hourly record series from the payload's parallel arrays
///
/// One record per entry of `hourly.time`; null entries in the numeric arrays
/// become absent fields. Arrays longer than the time array have their surplus
/// ignored; shorter ones are an error.
pub fn build_hourly_series(payload: &ForecastPayload) -> Result<Vec<HourlyRecord>, ForecastError> {
    let hourly = payload
        .hourly
        .as_ref()
        .ok_or_else(|| ForecastError::MissingField("hourly".to_string()))?;

    let len = hourly.time.len();
    check_series_len("precipitation_probability", &hourly.precipitation_probability, len)?;
    check_series_len("dew_point_2m", &hourly.dew_point_2m, len)?;
    check_series_len("temperature_2m", &hourly.temperature_2m, len)?;
    check_series_len("relative_humidity_2m", &hourly.relative_humidity_2m, len)?;
    check_series_len("cloud_cover", &hourly.cloud_cover, len)?;
    check_series_len("cloud_cover_low", &hourly.cloud_cover_low, len)?;
    check_series_len("cloud_cover_mid", &hourly.cloud_cover_mid, len)?;
    check_series_len("cloud_cover_high", &hourly.cloud_cover_high, len)?;
    check_series_len("wind_speed_10m", &hourly.wind_speed_10m, len)?;
    check_series_len("wind_direction_10m", &hourly.wind_direction_10m, len)?;

    let mut records = Vec::with_capacity(len);
    for i in 0..len {
        let timestamp = parse_datetime(&hourly.time[i])?;
        records.push(HourlyRecord {
            timestamp,
            hour: timestamp.hour(),
            temperature: hourly.temperature_2m[i],
            humidity: hourly.relative_humidity_2m[i],
            dew_point: hourly.dew_point_2m[i],
            cloud_cover: hourly.cloud_cover[i],
            cloud_cover_low: hourly.cloud_cover_low[i],
            cloud_cover_mid: hourly.cloud_cover_mid[i],
            cloud_cover_high: hourly.cloud_cover_high[i],
            wind_speed: hourly.wind_speed_10m[i],
            wind_direction: hourly.wind_direction_10m[i],
            precipitation_probability: hourly.precipitation_probability[i],
        });
    }

    Ok(records)
}

/// Parses daily sunrise/sunset strings into naive local datetimes
pub fn parse_daily(payload: &ForecastPayload) -> Result<DailySeries, ForecastError> {
    let daily = payload
        .daily
        .as_ref()
        .ok_or_else(|| ForecastError::MissingField("daily".to_string()))?;
    let sunrise = daily
        .sunrise
        .as_ref()
        .ok_or_else(|| ForecastError::MissingField("daily.sunrise".to_string()))?;
    let sunset = daily
        .sunset
        .as_ref()
        .ok_or_else(|| ForecastError::MissingField("daily.sunset".to_string()))?;

    Ok(DailySeries {
        sunrise: parse_datetimes(sunrise)?,
        sunset: parse_datetimes(sunset)?,
    })
}

/// Errors if a parallel array cannot cover every index of the time array
fn check_series_len(
    field: &'static str,
    series: &[Option<f64>],
    expected: usize,
) -> Result<(), ForecastError> {
    if series.len() < expected {
        return Err(ForecastError::InconsistentSeries {
            field,
            expected,
            actual: series.len(),
        });
    }
    Ok(())
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:30") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, ForecastError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| ForecastError::InvalidTimeFormat(datetime_str.to_string()))
}

fn parse_datetimes(datetime_strs: &[String]) -> Result<Vec<NaiveDateTime>, ForecastError> {
    datetime_strs.iter().map(|s| parse_datetime(s)).collect()
}
