//! Configuration Module
//!
//! Handles loading cache manager defaults and server settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheOptions, DEFAULT_MAX_ENTRIES, DEFAULT_TIME_TO_LIVE};

/// Default upper bound for the active expiry sweep period, in milliseconds
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Default per-cache event queue capacity
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 65_536;

/// Process configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for caches created without an explicit TTL
    pub default_ttl_secs: u64,
    /// Default maximum number of entries per cache
    pub default_max_entries: usize,
    /// Upper bound on the background expiry sweep period, in milliseconds
    pub sweep_interval_ms: u64,
    /// Capacity of each cache's event queue
    pub event_queue_capacity: usize,
    /// Attach a logging listener to every new cache
    pub log_events: bool,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL_SECS` - Default TTL in seconds (default: 6 days)
    /// - `CACHE_DEFAULT_MAX_ENTRIES` - Default cache capacity (default: 1000000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Max expiry sweep period (default: 1000)
    /// - `CACHE_EVENT_QUEUE_CAPACITY` - Event queue capacity (default: 65536)
    /// - `CACHE_LOG_EVENTS` - Log every cache event (default: true)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_secs: env_or("CACHE_DEFAULT_TTL_SECS", defaults.default_ttl_secs),
            default_max_entries: env_or("CACHE_DEFAULT_MAX_ENTRIES", defaults.default_max_entries),
            sweep_interval_ms: env_or("CACHE_SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
            event_queue_capacity: env_or(
                "CACHE_EVENT_QUEUE_CAPACITY",
                defaults.event_queue_capacity,
            ),
            log_events: env_or("CACHE_LOG_EVENTS", defaults.log_events),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Options every cache falls back to for fields it leaves unset.
    pub fn default_cache_options(&self) -> CacheOptions {
        CacheOptions::builder()
            .time_to_live(Duration::from_secs(self.default_ttl_secs))
            .max_entries(self.default_max_entries)
            .build()
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_TIME_TO_LIVE.as_secs(),
            default_max_entries: DEFAULT_MAX_ENTRIES,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            log_events: true,
            server_port: 3000,
        }
    }
}

fn env_or<T: FromStr>(name: &str, fallback: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}
