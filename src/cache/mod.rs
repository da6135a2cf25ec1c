//! Cache Module
//!
//! Provides named in-memory caches with TTL expiration, LRU eviction and
//! ordered lifecycle events.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

mod entry;
mod expiry;
mod info;
mod lru;
mod options;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiry::{ExpirationPolicy, MIN_SWEEP_INTERVAL};
pub use info::CacheInfo;
pub use lru::LruTracker;
pub use options::{CacheOptions, CacheOptionsBuilder};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::Cache;

// == Public Constants ==
/// TTL used when neither the cache nor the manager sets one (6 days)
pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(6 * 24 * 60 * 60);

/// Capacity used when neither the cache nor the manager sets one
pub const DEFAULT_MAX_ENTRIES: usize = 1_000_000;

// == Key and Value Bounds ==
/// Types usable as cache keys. Equality and hashing are the key type's own.
pub trait CacheKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> CacheKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// Types usable as cache values. Distinct counting uses the value type's
/// own equality and hashing.
pub trait CacheValue: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}
