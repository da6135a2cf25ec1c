//! Cache Options Module
//!
//! Immutable per-cache configuration with field-by-field default merging.

use std::time::Duration;

use serde::Serialize;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TIME_TO_LIVE};

// == Cache Options ==
/// Time-to-live and capacity settings for one cache.
///
/// Unset fields fall back to another `CacheOptions` through [`CacheOptions::merge`],
/// typically the defaults owned by a [`CacheManager`](crate::CacheManager).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheOptions {
    time_to_live: Option<Duration>,
    max_entries: Option<usize>,
}

impl CacheOptions {
    /// Creates options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CacheOptionsBuilder {
        CacheOptionsBuilder::default()
    }

    pub fn with_time_to_live(mut self, time_to_live: Duration) -> Self {
        self.time_to_live = Some(time_to_live);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    // == Merge ==
    /// Returns a copy where every unset field is taken from `defaults`.
    pub fn merge(&self, defaults: &CacheOptions) -> CacheOptions {
        CacheOptions {
            time_to_live: self.time_to_live.or(defaults.time_to_live),
            max_entries: self.max_entries.or(defaults.max_entries),
        }
    }

    /// Configured TTL, or the built-in default when unset.
    pub fn time_to_live(&self) -> Duration {
        self.time_to_live.unwrap_or(DEFAULT_TIME_TO_LIVE)
    }

    /// Configured capacity, or the built-in default when unset.
    pub fn max_entries(&self) -> usize {
        self.max_entries.unwrap_or(DEFAULT_MAX_ENTRIES)
    }

    pub fn is_time_to_live_set(&self) -> bool {
        self.time_to_live.is_some()
    }

    pub fn is_max_entries_set(&self) -> bool {
        self.max_entries.is_some()
    }
}

// == Builder ==
#[derive(Debug, Default)]
pub struct CacheOptionsBuilder {
    options: CacheOptions,
}

impl CacheOptionsBuilder {
    pub fn time_to_live(mut self, time_to_live: Duration) -> Self {
        self.options.time_to_live = Some(time_to_live);
        self
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.options.max_entries = Some(max_entries);
        self
    }

    pub fn build(self) -> CacheOptions {
        self.options
    }
}
