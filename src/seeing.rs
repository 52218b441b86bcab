//! Seeing quality heuristics
//!
//! Scores how steady the air is for telescope viewing on a 1-5 scale. The
//! model blends four factors: the temperature-to-dew-point spread (measured
//! over two ranges), wind speed, and relative humidity, with wind carrying
//! the largest weight.

use crate::data::HourlyRecord;

/// Lower clamp applied to every factor
const MIN_FACTOR: f64 = 0.1;

/// Temperature-dew-point spread in Celsius beyond which the temperature
/// factor bottoms out
const TEMP_SPREAD_RANGE: f64 = 15.0;

/// Spread in Celsius beyond which the dew-point factor bottoms out
const DEW_SPREAD_RANGE: f64 = 10.0;

/// Wind speed in km/h beyond which the wind factor bottoms out
const WIND_RANGE_KMH: f64 = 25.0;

/// Factor weights; they sum to 1
const TEMP_WEIGHT: f64 = 0.25;
const WIND_WEIGHT: f64 = 0.40;
const HUMIDITY_WEIGHT: f64 = 0.15;
const DEW_WEIGHT: f64 = 0.20;

/// Scores one hour's seeing from raw conditions
///
/// # Arguments
/// * `temperature` - Air temperature in Celsius
/// * `dew_point` - Dew point in Celsius
/// * `wind_speed` - Wind speed in km/h
/// * `humidity` - Relative humidity percentage (0-100)
///
/// # Returns
/// An integer score from 1 (poor) to 5 (excellent)
pub fn score(temperature: f64, dew_point: f64, wind_speed: f64, humidity: f64) -> u8 {
    let spread = (temperature - dew_point).abs();

    let temp_factor = clamp_factor((TEMP_SPREAD_RANGE - spread) / TEMP_SPREAD_RANGE);
    let wind_factor = clamp_factor(1.0 - wind_speed / WIND_RANGE_KMH);
    let humidity_factor = clamp_factor(1.0 - humidity / 100.0);
    let dew_factor = clamp_factor((DEW_SPREAD_RANGE - spread) / DEW_SPREAD_RANGE);

    let weighted = TEMP_WEIGHT * temp_factor
        + WIND_WEIGHT * wind_factor
        + HUMIDITY_WEIGHT * humidity_factor
        + DEW_WEIGHT * dew_factor;

    (weighted * 5.0).max(1.0).round() as u8
}

/// Scores one hourly record, if it carries all four inputs
pub fn score_record(record: &HourlyRecord) -> Option<u8> {
    match (
        record.temperature,
        record.dew_point,
        record.wind_speed,
        record.humidity,
    ) {
        (Some(t), Some(dew), Some(wind), Some(humidity)) => Some(score(t, dew, wind, humidity)),
        _ => None,
    }
}

/// Mean seeing score over a set of records, rounded to the nearest integer
///
/// Records missing any input are skipped. Returns 0 when nothing is
/// scorable; callers render that as missing data.
pub fn average_score(records: &[HourlyRecord]) -> u8 {
    let scores: Vec<u8> = records.iter().filter_map(score_record).collect();
    if scores.is_empty() {
        return 0;
    }

    let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64;
    mean.round() as u8
}

fn clamp_factor(value: f64) -> f64 {
    value.clamp(MIN_FACTOR, 1.0)
}
