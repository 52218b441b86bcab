//! Persistence module: the key-value store port and the forecast cache
//!
//! The store keeps plain string values on disk (or in memory for tests); the
//! forecast cache layers payload serialization and a one-hour freshness rule
//! on top of it.

mod manager;
mod store;

pub use manager::{cache_ttl, CacheEntry, ForecastCache, CACHE_KEY, CACHE_TIMESTAMP_KEY, CACHE_TTL_MS};
pub use store::{FsStore, MemoryStore, Store};
