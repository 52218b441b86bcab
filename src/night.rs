//! Night-window aggregation
//!
//! Filters the hourly series down to the records inside the night window and
//! reduces them to the summary the observer reads: worst cloud cover, mean
//! conditions, dominant wind direction, worst precipitation risk, and the
//! averaged seeing index. Extremes default to 0 and averages to absent when
//! the window holds no usable values.

use crate::data::{CompassPoint, HourlyRecord, NightSummary, NightWindow};
use crate::seeing;

/// Reduces the hourly series over one night window to its summary
pub fn summarize_night(records: &[HourlyRecord], window: &NightWindow) -> NightSummary {
    let night: Vec<HourlyRecord> = records
        .iter()
        .filter(|record| window.contains(record.timestamp))
        .copied()
        .collect();

    NightSummary {
        window: *window,
        sampled_hours: night.len(),
        extreme_cloud_cover: max_field(&night, |r| r.cloud_cover),
        avg_temperature: average_field(&night, |r| r.temperature),
        avg_humidity: average_field(&night, |r| r.humidity),
        avg_wind_speed: average_field(&night, |r| r.wind_speed),
        avg_dew_point: average_field(&night, |r| r.dew_point),
        dominant_wind_direction: dominant_wind_direction(&night),
        max_precipitation_probability: max_field(&night, |r| r.precipitation_probability),
        seeing_index: seeing::average_score(&night),
    }
}

/// Maximum of the valid values of a field, 0 when there are none
fn max_field(records: &[HourlyRecord], field: impl Fn(&HourlyRecord) -> Option<f64>) -> f64 {
    records.iter().filter_map(field).fold(0.0, f64::max)
}

/// Mean of the valid values of a field, rounded to one decimal
///
/// Null entries are filtered out before averaging; a field with no valid
/// entries at all stays absent instead of reading as zero.
fn average_field(
    records: &[HourlyRecord],
    field: impl Fn(&HourlyRecord) -> Option<f64>,
) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(field).collect();
    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(round_one_decimal(mean))
}

/// Rounds half up at the first decimal (10.55 -> 10.6, 10.549 -> 10.5)
fn round_one_decimal(value: f64) -> f64 {
    ((value * 10.0) + 0.5).floor() / 10.0
}

/// Circular mean of the valid wind directions, bucketed to the compass rose
///
/// Averaging angles component-wise keeps 350 and 10 degrees from averaging to
/// south. Returns `None` when no record carries a direction.
fn dominant_wind_direction(records: &[HourlyRecord]) -> Option<CompassPoint> {
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    let mut count = 0usize;

    for direction in records.iter().filter_map(|r| r.wind_direction) {
        let radians = direction.to_radians();
        sin_sum += radians.sin();
        cos_sum += radians.cos();
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let angle = sin_sum.atan2(cos_sum).to_degrees();
    let normalized = ((angle + 0.5).floor() + 360.0) % 360.0;
    Some(CompassPoint::from_degrees(normalized))
}
