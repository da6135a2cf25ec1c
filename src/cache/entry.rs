//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was first created
    pub created_at: Instant,
    /// When the entry becomes stale; refreshed on every overwrite
    pub expires_at: Instant,
    /// Position in the eviction order
    pub(crate) tick: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry written at `now`.
    pub fn new(value: V, now: Instant, expires_at: Instant, tick: u64) -> Self {
        Self {
            value,
            created_at: now,
            expires_at,
            tick,
        }
    }

    // == Replace ==
    /// Swaps in a new value, refreshes the expiry and returns the old value.
    pub fn replace(&mut self, value: V, expires_at: Instant) -> V {
        self.expires_at = expires_at;
        std::mem::replace(&mut self.value, value)
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// An entry is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
