//! Core data models for skygaze
//!
//! This module contains the data types used throughout the application for
//! representing places, hourly forecast records, and the derived night
//! observation summary.

pub mod forecast;
pub mod places;

pub use forecast::{CurrentConditions, DailySeries, ForecastClient, ForecastError, ForecastPayload};
pub use places::{PlaceClient, PlaceError};

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

/// A geocoded place the forecast can be fetched for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Human-readable name of the place
    pub name: String,
    /// ISO 3166-1 alpha-2 country code, uppercase (may be empty)
    pub countrycode: String,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
}

impl Place {
    /// Display label combining the name and country code
    pub fn label(&self) -> String {
        if self.countrycode.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.countrycode)
        }
    }
}

/// One hour of forecast data
///
/// Meteorological fields are optional because the upstream arrays may carry
/// nulls for hours the model did not produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Timestamp in the forecast location's local time
    pub timestamp: NaiveDateTime,
    /// Hour of day (0-23), extracted from the timestamp
    pub hour: u32,
    /// Air temperature at 2m in Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage (0-100)
    pub humidity: Option<f64>,
    /// Dew point at 2m in Celsius
    pub dew_point: Option<f64>,
    /// Total cloud cover percentage (0-100)
    pub cloud_cover: Option<f64>,
    /// Low-altitude cloud cover percentage
    pub cloud_cover_low: Option<f64>,
    /// Mid-altitude cloud cover percentage
    pub cloud_cover_mid: Option<f64>,
    /// High-altitude cloud cover percentage
    pub cloud_cover_high: Option<f64>,
    /// Wind speed at 10m in km/h
    pub wind_speed: Option<f64>,
    /// Wind direction at 10m in degrees (0-360, meteorological)
    pub wind_direction: Option<f64>,
    /// Precipitation probability percentage (0-100)
    pub precipitation_probability: Option<f64>,
}

impl HourlyRecord {
    /// Creates an empty record at the given timestamp, all fields absent
    pub fn at(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            hour: timestamp.hour(),
            temperature: None,
            humidity: None,
            dew_point: None,
            cloud_cover: None,
            cloud_cover_low: None,
            cloud_cover_mid: None,
            cloud_cover_high: None,
            wind_speed: None,
            wind_direction: None,
            precipitation_probability: None,
        }
    }
}

/// The astronomical night window: dusk to dawn in location-local time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NightWindow {
    /// Start of the window (sunset of day 0 plus the twilight offset)
    pub dusk: NaiveDateTime,
    /// End of the window (sunrise of day 1 minus the twilight offset)
    pub dawn: NaiveDateTime,
}

impl NightWindow {
    /// Whether a timestamp falls inside the window, boundaries included
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.dusk && timestamp <= self.dawn
    }

    /// Length of the window
    pub fn duration(&self) -> TimeDelta {
        self.dawn - self.dusk
    }
}

/// Eight-point compass rose for wind direction display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    /// Buckets a direction angle in degrees into the nearest compass point
    ///
    /// Each point owns a 45-degree sector centered on its heading, so north
    /// covers 337.5-360 and 0-22.5. Angles outside 0-360 are normalized.
    pub fn from_degrees(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let index = ((normalized + 22.5) / 45.0).floor() as usize % 8;
        [
            CompassPoint::North,
            CompassPoint::NorthEast,
            CompassPoint::East,
            CompassPoint::SouthEast,
            CompassPoint::South,
            CompassPoint::SouthWest,
            CompassPoint::West,
            CompassPoint::NorthWest,
        ][index]
    }

    /// Short label for display ("N", "NE", ...)
    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::NorthEast => "NE",
            CompassPoint::East => "E",
            CompassPoint::SouthEast => "SE",
            CompassPoint::South => "S",
            CompassPoint::SouthWest => "SW",
            CompassPoint::West => "W",
            CompassPoint::NorthWest => "NW",
        }
    }
}

/// Aggregated observing conditions over one night window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightSummary {
    /// The window the records were filtered to
    pub window: NightWindow,
    /// Number of hourly records that fell inside the window
    pub sampled_hours: usize,
    /// Worst (maximum) total cloud cover over the night, 0 when no data
    pub extreme_cloud_cover: f64,
    /// Mean temperature in Celsius, absent when no hour carried a value
    pub avg_temperature: Option<f64>,
    /// Mean relative humidity percentage
    pub avg_humidity: Option<f64>,
    /// Mean wind speed in km/h
    pub avg_wind_speed: Option<f64>,
    /// Mean dew point in Celsius
    pub avg_dew_point: Option<f64>,
    /// Dominant wind direction (circular mean), absent when no valid angles
    pub dominant_wind_direction: Option<CompassPoint>,
    /// Worst (maximum) precipitation probability over the night, 0 when no data
    pub max_precipitation_probability: f64,
    /// Seeing index 1-5 averaged over the night, 0 when no scorable hours
    pub seeing_index: u8,
}

impl NightSummary {
    /// Compass label for display, the literal "N/A" when no direction exists
    pub fn wind_direction_label(&self) -> &'static str {
        match self.dominant_wind_direction {
            Some(point) => point.label(),
            None => "N/A",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_place_label_with_country() {
        let place = Place {
            name: "Brest".to_string(),
            countrycode: "FR".to_string(),
            lat: 48.39,
            lon: -4.49,
        };

        assert_eq!(place.label(), "Brest (FR)");
    }

    #[test]
    fn test_place_label_without_country() {
        let place = Place {
            name: "Somewhere".to_string(),
            countrycode: String::new(),
            lat: 0.0,
            lon: 0.0,
        };

        assert_eq!(place.label(), "Somewhere");
    }

    #[test]
    fn test_place_serialization_roundtrip() {
        let place = Place {
            name: "Quebec".to_string(),
            countrycode: "CA".to_string(),
            lat: 46.8131,
            lon: -71.2075,
        };

        let json = serde_json::to_string(&place).expect("Failed to serialize Place");
        let deserialized: Place = serde_json::from_str(&json).expect("Failed to deserialize Place");

        assert_eq!(deserialized, place);
    }

    #[test]
    fn test_hourly_record_hour_extraction() {
        let record = HourlyRecord::at(ts(2024, 6, 1, 23, 0));

        assert_eq!(record.hour, 23);
        assert!(record.temperature.is_none());
        assert!(record.cloud_cover.is_none());
    }

    #[test]
    fn test_night_window_contains_is_inclusive() {
        let window = NightWindow {
            dusk: ts(2024, 6, 1, 23, 0),
            dawn: ts(2024, 6, 2, 4, 0),
        };

        assert!(window.contains(ts(2024, 6, 1, 23, 0)), "dusk itself is in");
        assert!(window.contains(ts(2024, 6, 2, 4, 0)), "dawn itself is in");
        assert!(window.contains(ts(2024, 6, 2, 1, 30)));
        assert!(!window.contains(ts(2024, 6, 1, 22, 59)));
        assert!(!window.contains(ts(2024, 6, 2, 4, 1)));
    }

    #[test]
    fn test_night_window_duration() {
        let window = NightWindow {
            dusk: ts(2024, 6, 1, 23, 0),
            dawn: ts(2024, 6, 2, 4, 0),
        };

        assert_eq!(window.duration(), TimeDelta::hours(5));
    }

    #[test]
    fn test_compass_point_sector_centers() {
        assert_eq!(CompassPoint::from_degrees(0.0), CompassPoint::North);
        assert_eq!(CompassPoint::from_degrees(45.0), CompassPoint::NorthEast);
        assert_eq!(CompassPoint::from_degrees(90.0), CompassPoint::East);
        assert_eq!(CompassPoint::from_degrees(135.0), CompassPoint::SouthEast);
        assert_eq!(CompassPoint::from_degrees(180.0), CompassPoint::South);
        assert_eq!(CompassPoint::from_degrees(225.0), CompassPoint::SouthWest);
        assert_eq!(CompassPoint::from_degrees(270.0), CompassPoint::West);
        assert_eq!(CompassPoint::from_degrees(315.0), CompassPoint::NorthWest);
    }

    #[test]
    fn test_compass_point_sector_boundaries() {
        // Sectors are 45 degrees wide, centered on the heading
        assert_eq!(CompassPoint::from_degrees(22.4), CompassPoint::North);
        assert_eq!(CompassPoint::from_degrees(22.5), CompassPoint::NorthEast);
        assert_eq!(CompassPoint::from_degrees(337.4), CompassPoint::NorthWest);
        assert_eq!(CompassPoint::from_degrees(337.5), CompassPoint::North);
        assert_eq!(CompassPoint::from_degrees(359.9), CompassPoint::North);
    }

    #[test]
    fn test_compass_point_normalizes_out_of_range_angles() {
        assert_eq!(CompassPoint::from_degrees(360.0), CompassPoint::North);
        assert_eq!(CompassPoint::from_degrees(450.0), CompassPoint::East);
        assert_eq!(CompassPoint::from_degrees(-90.0), CompassPoint::West);
    }

    #[test]
    fn test_wind_direction_label_falls_back_to_na() {
        let window = NightWindow {
            dusk: ts(2024, 6, 1, 23, 0),
            dawn: ts(2024, 6, 2, 4, 0),
        };
        let summary = NightSummary {
            window,
            sampled_hours: 0,
            extreme_cloud_cover: 0.0,
            avg_temperature: None,
            avg_humidity: None,
            avg_wind_speed: None,
            avg_dew_point: None,
            dominant_wind_direction: None,
            max_precipitation_probability: 0.0,
            seeing_index: 0,
        };

        assert_eq!(summary.wind_direction_label(), "N/A");

        let with_direction = NightSummary {
            dominant_wind_direction: Some(CompassPoint::NorthWest),
            ..summary
        };
        assert_eq!(with_direction.wind_direction_label(), "NW");
    }
}
