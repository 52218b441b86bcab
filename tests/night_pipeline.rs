//! Integration tests for the night outlook pipeline
//!
//! Drives a realistic upstream payload through parsing, window derivation
//! and aggregation, and exercises the forecast cache end to end, without
//! touching the network.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use skygaze::astro;
use skygaze::cache::{cache_ttl, ForecastCache, FsStore, MemoryStore, CACHE_TTL_MS};
use skygaze::data::forecast::{build_hourly_series, parse_daily, validate_payload};
use skygaze::data::{CompassPoint, ForecastClient, ForecastPayload, Place};
use skygaze::night::summarize_night;
use skygaze::service::WeatherService;

/// A trimmed-down but structurally faithful upstream response: two daily
/// entries, six hourly entries straddling the night window, one null row.
const NIGHT_RESPONSE: &str = r#"{
    "latitude": 48.39,
    "longitude": -4.49,
    "timezone": "Europe/Paris",
    "current": {
        "time": "2024-10-12T21:15",
        "temperature_2m": 12.5,
        "relative_humidity_2m": 78.0,
        "cloud_cover": 15.0,
        "wind_speed_10m": 9.0,
        "wind_direction_10m": 350.0,
        "precipitation_probability": 5.0,
        "dew_point_2m": 8.7
    },
    "daily": {
        "time": ["2024-10-12", "2024-10-13"],
        "sunrise": ["2024-10-12T07:58", "2024-10-13T08:00"],
        "sunset": ["2024-10-12T19:26", "2024-10-13T19:24"]
    },
    "hourly": {
        "time": [
            "2024-10-12T21:00",
            "2024-10-12T22:00",
            "2024-10-12T23:00",
            "2024-10-13T00:00",
            "2024-10-13T01:00",
            "2024-10-13T07:00"
        ],
        "temperature_2m": [13.0, 12.0, 11.0, 10.0, 10.0, 9.0],
        "relative_humidity_2m": [75.0, 80.0, 82.0, 84.0, 85.0, 90.0],
        "dew_point_2m": [9.0, 9.0, 9.0, 8.5, 8.5, 8.0],
        "cloud_cover": [40.0, 20.0, 10.0, null, 30.0, 95.0],
        "cloud_cover_low": [10.0, 10.0, 5.0, null, 10.0, 80.0],
        "cloud_cover_mid": [20.0, 5.0, 5.0, null, 15.0, 40.0],
        "cloud_cover_high": [30.0, 5.0, 0.0, null, 10.0, 20.0],
        "wind_speed_10m": [9.0, 8.0, 8.0, 7.0, 7.0, 12.0],
        "wind_direction_10m": [340.0, 350.0, 10.0, 350.0, 10.0, 270.0],
        "precipitation_probability": [20.0, 10.0, 0.0, 5.0, 0.0, 60.0]
    }
}"#;

fn parse_payload() -> ForecastPayload {
    serde_json::from_str(NIGHT_RESPONSE).expect("Fixture should parse")
}

fn naive(date: (i32, u32, u32), hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn test_payload_flows_through_to_a_night_summary() {
    let payload = parse_payload();
    validate_payload(&payload).expect("Payload should validate");

    let records = build_hourly_series(&payload).expect("Hourly series should build");
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].hour, 21);
    assert!(
        records[3].cloud_cover.is_none(),
        "null cells should stay absent"
    );

    let daily = parse_daily(&payload).expect("Daily series should parse");
    let now = naive((2024, 10, 12), 21, 30);
    let window =
        astro::compute_night_window(&daily.sunrise, &daily.sunset, now).expect("Window");

    assert_eq!(window.dusk, naive((2024, 10, 12), 21, 26));
    assert_eq!(window.dawn, naive((2024, 10, 13), 6, 0));

    let summary = summarize_night(&records, &window);

    // 21:00 and 07:00 fall outside the window
    assert_eq!(summary.sampled_hours, 4);
    assert_eq!(summary.avg_temperature, Some(10.8));
    assert_eq!(summary.avg_humidity, Some(82.8));
    assert_eq!(summary.avg_wind_speed, Some(7.5));
    assert_eq!(summary.avg_dew_point, Some(8.8));
    assert_eq!(
        summary.extreme_cloud_cover, 30.0,
        "the null row must not count and outside rows must be ignored"
    );
    assert_eq!(summary.max_precipitation_probability, 10.0);
    assert_eq!(
        summary.dominant_wind_direction,
        Some(CompassPoint::North),
        "340-10 degree winds average out to north"
    );
    assert_eq!(summary.seeing_index, 4);
    assert_eq!(summary.wind_direction_label(), "N");
}

#[test]
fn test_cache_roundtrip_preserves_payload_and_timestamp() {
    let cache = ForecastCache::new(Arc::new(MemoryStore::default()));
    let payload = parse_payload();
    let fetched_at = DateTime::from_timestamp(1_728_763_200, 0).unwrap();

    cache.put(&payload, fetched_at).expect("Put should succeed");
    let entry = cache.get().expect("Entry should be readable back");

    assert_eq!(entry.fetched_at, fetched_at);
    let sunset = entry
        .payload
        .daily
        .as_ref()
        .and_then(|d| d.sunset.as_ref())
        .expect("Sunset should survive the roundtrip");
    assert_eq!(sunset.len(), 2);
}

#[test]
fn test_cache_freshness_boundary_is_strict() {
    let cache = ForecastCache::new(Arc::new(MemoryStore::default()));
    let fetched_at: DateTime<Utc> = DateTime::from_timestamp(1_728_763_200, 0).unwrap();
    cache
        .put(&parse_payload(), fetched_at)
        .expect("Put should succeed");
    let entry = cache.get().expect("Entry should be readable back");

    let just_before = fetched_at + TimeDelta::milliseconds(CACHE_TTL_MS - 1);
    let exact_ttl = fetched_at + TimeDelta::milliseconds(CACHE_TTL_MS);

    assert!(ForecastCache::is_fresh(&entry, just_before, cache_ttl()));
    assert!(
        !ForecastCache::is_fresh(&entry, exact_ttl, cache_ttl()),
        "an entry exactly one TTL old is already stale"
    );
}

#[test]
fn test_cache_roundtrip_over_the_filesystem_store() {
    let dir = TempDir::new().expect("Temp dir should be created");
    let cache = ForecastCache::new(Arc::new(FsStore::with_dir(dir.path().to_path_buf())));
    let fetched_at = DateTime::from_timestamp(1_728_763_200, 0).unwrap();

    cache
        .put(&parse_payload(), fetched_at)
        .expect("Put should succeed");

    let entry = cache.get().expect("Entry should be readable back");
    assert_eq!(entry.fetched_at, fetched_at);
    assert!(
        dir.path().join("weather.json").exists(),
        "payload should land in a json file under the cache dir"
    );
}

#[tokio::test]
async fn test_night_outlook_is_served_from_a_fresh_cache() {
    let cache = ForecastCache::new(Arc::new(MemoryStore::default()));

    // A fresh cache entry means the service never needs the network
    let now = DateTime::parse_from_rfc3339("2024-10-12T21:30:00+02:00").unwrap();
    let fetched_at = now.to_utc() - TimeDelta::minutes(10);
    cache
        .put(&parse_payload(), fetched_at)
        .expect("Put should succeed");

    let service = WeatherService::new(ForecastClient::new(), cache);
    let place = Place {
        name: "Brest".to_string(),
        countrycode: "FR".to_string(),
        lat: 48.39,
        lon: -4.49,
    };

    let outlook = service
        .night_outlook(&place, now)
        .await
        .expect("Outlook should come from cache");

    assert_eq!(outlook.window.dusk, naive((2024, 10, 12), 21, 26));
    assert_eq!(outlook.window.dawn, naive((2024, 10, 13), 6, 0));
    assert_eq!(outlook.hourly.len(), 6);
    assert_eq!(outlook.night.seeing_index, 4);
    assert_eq!(outlook.fetched_at, fetched_at);
    let current = outlook.current.expect("Current block should be present");
    assert_eq!(current.temperature_2m, Some(12.5));
}
