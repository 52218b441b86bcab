//! Weather service orchestration
//!
//! Ties the forecast client, the cache, and the night pipeline together.
//! Fetches are cache-first with a single upstream attempt: a fresh cached
//! payload short-circuits the network entirely, and a failed fetch propagates
//! even when a stale entry exists.

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::debug;

use crate::astro::{self, AstroError};
use crate::cache::{cache_ttl, ForecastCache};
use crate::data::forecast::{
    build_hourly_series, parse_daily, validate_payload, CurrentConditions,
};
use crate::data::{
    ForecastClient, ForecastError, ForecastPayload, HourlyRecord, NightSummary, NightWindow, Place,
};
use crate::night::summarize_night;

/// Errors surfaced by the service pipeline
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Astro(#[from] AstroError),
}

/// Everything the presentation layer needs for one place's night
#[derive(Debug, Clone)]
pub struct NightOutlook {
    /// Current conditions block, when upstream provided one
    pub current: Option<CurrentConditions>,
    /// Full hourly series from the payload
    pub hourly: Vec<HourlyRecord>,
    /// Tonight's observation window
    pub window: NightWindow,
    /// Aggregated conditions inside the window
    pub night: NightSummary,
    /// When the underlying payload was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Orchestrates cache lookups, upstream fetches, and the night pipeline
pub struct WeatherService {
    client: ForecastClient,
    cache: ForecastCache,
}

impl WeatherService {
    /// Creates a service over the given client and cache
    pub fn new(client: ForecastClient, cache: ForecastCache) -> Self {
        Self { client, cache }
    }

    /// Returns the forecast payload for a place, cache-first
    ///
    /// A cached payload still inside its TTL is returned without touching the
    /// network. Otherwise a single upstream fetch runs; its payload is
    /// validated, written back to the cache, and returned. Fetch failures
    /// propagate; an expired cache entry is never served as a fallback.
    ///
    /// # Arguments
    /// * `place` - The place to fetch for
    /// * `now` - Current instant, used for the freshness decision and
    ///   recorded as the fetch timestamp
    pub async fn fetch_payload(
        &self,
        place: &Place,
        now: DateTime<Utc>,
    ) -> Result<ForecastPayload, ForecastError> {
        if let Some(entry) = self.cache.get() {
            if ForecastCache::is_fresh(&entry, now, cache_ttl()) {
                debug!("using cached weather data");
                return Ok(entry.payload);
            }
        }

        debug!(lat = place.lat, lon = place.lon, "fetching fresh weather data");
        let payload = self.client.fetch_forecast(place.lat, place.lon).await?;
        validate_payload(&payload)?;

        if let Err(err) = self.cache.put(&payload, now) {
            debug!(error = %err, "failed to persist forecast to the store");
        }

        Ok(payload)
    }

    /// Runs the full pipeline: payload, hourly series, window, summary
    ///
    /// `now` carries the local offset so the same instant feeds both the
    /// UTC-based freshness check and the wall-clock window derivation.
    pub async fn night_outlook(
        &self,
        place: &Place,
        now: DateTime<FixedOffset>,
    ) -> Result<NightOutlook, ServiceError> {
        let now_utc = now.to_utc();
        let payload = self.fetch_payload(place, now_utc).await?;

        let hourly = build_hourly_series(&payload)?;
        let daily = parse_daily(&payload)?;
        let window = astro::compute_night_window(&daily.sunrise, &daily.sunset, now.naive_local())?;
        let night = summarize_night(&hourly, &window);

        let fetched_at = self
            .cache
            .get()
            .map(|entry| entry.fetched_at)
            .unwrap_or(now_utc);

        Ok(NightOutlook {
            current: payload.current,
            hourly,
            window,
            night,
            fetched_at,
        })
    }

    /// Drops the cached payload so the next outlook goes upstream
    pub fn invalidate_cache(&self) {
        if let Err(err) = self.cache.clear() {
            debug!(error = %err, "failed to clear forecast cache");
        }
    }
}
