//! Forecast cache over the persistence port
//!
//! Persists the last fetched forecast payload together with its fetch
//! timestamp under two store keys, and answers the freshness question against
//! a fixed one-hour TTL. A missing or unreadable entry is simply a miss.

use chrono::{DateTime, TimeDelta, Utc};
use std::io;
use std::sync::Arc;

use super::Store;
use crate::data::ForecastPayload;

/// Store key holding the serialized forecast payload
pub const CACHE_KEY: &str = "weather";

/// Store key holding the fetch timestamp in epoch milliseconds
pub const CACHE_TIMESTAMP_KEY: &str = "weather_timestamp";

/// How long a cached payload counts as fresh
pub const CACHE_TTL_MS: i64 = 60 * 60 * 1000;

/// Returns the cache TTL as a duration
pub fn cache_ttl() -> TimeDelta {
    TimeDelta::milliseconds(CACHE_TTL_MS)
}

/// A cached payload and the instant it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The payload as it came from upstream
    pub payload: ForecastPayload,
    /// When the payload was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Cache for the last fetched forecast payload
#[derive(Clone)]
pub struct ForecastCache {
    store: Arc<dyn Store>,
}

impl ForecastCache {
    /// Creates a cache over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reads the cached entry
    ///
    /// Returns `None` when either key is absent or does not parse; corruption
    /// behaves like a miss so the caller refetches.
    pub fn get(&self) -> Option<CacheEntry> {
        let raw_payload = self.store.get(CACHE_KEY)?;
        let payload: ForecastPayload = serde_json::from_str(&raw_payload).ok()?;

        let raw_timestamp = self.store.get(CACHE_TIMESTAMP_KEY)?;
        let millis: i64 = raw_timestamp.trim().parse().ok()?;
        let fetched_at = DateTime::from_timestamp_millis(millis)?;

        Some(CacheEntry {
            payload,
            fetched_at,
        })
    }

    /// Writes a payload and its fetch instant, replacing any previous entry
    pub fn put(&self, payload: &ForecastPayload, fetched_at: DateTime<Utc>) -> io::Result<()> {
        let json = serde_json::to_string(payload)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.store.set(CACHE_KEY, &json)?;
        self.store
            .set(CACHE_TIMESTAMP_KEY, &fetched_at.timestamp_millis().to_string())
    }

    /// Removes the cached entry; the next fetch will go upstream
    pub fn clear(&self) -> io::Result<()> {
        self.store.remove(CACHE_KEY)?;
        self.store.remove(CACHE_TIMESTAMP_KEY)
    }

    /// Whether an entry is still fresh at `now`
    ///
    /// Strict comparison: an entry aged exactly the TTL is stale.
    pub fn is_fresh(entry: &CacheEntry, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now.signed_duration_since(entry.fetched_at) < ttl
    }
}
