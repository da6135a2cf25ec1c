//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheInfo, CacheStatsSnapshot};

/// Response body for the cache listing (GET /caches)
#[derive(Debug, Clone, Serialize)]
pub struct CacheListResponse {
    /// One snapshot per registered cache, sorted by alias
    pub caches: Vec<CacheInfo>,
    /// When the snapshot was taken, RFC 3339
    pub generated_at: String,
}

impl CacheListResponse {
    pub fn new(caches: Vec<CacheInfo>) -> Self {
        Self {
            caches,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the stats endpoint (GET /caches/:alias/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub alias: String,
    #[serde(flatten)]
    pub stats: CacheStatsSnapshot,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(alias: impl Into<String>, stats: CacheStatsSnapshot) -> Self {
        Self {
            alias: alias.into(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for cache removal (DELETE /caches/:alias)
#[derive(Debug, Clone, Serialize)]
pub struct RemoveCacheResponse {
    /// Success message
    pub message: String,
    /// Whether a cache was registered under the alias
    pub removed: bool,
}

impl RemoveCacheResponse {
    pub fn new(alias: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Cache '{}' removed", alias)
        } else {
            format!("Cache '{}' was not registered", alias)
        };
        Self { message, removed }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Number of registered caches
    pub caches: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(caches: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            caches,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
