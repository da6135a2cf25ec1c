//! Cache Info Module

use serde::Serialize;

/// Read-only size snapshot of one cache, for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    pub alias: String,
    /// Live (unexpired) entries
    pub number_of_entries: usize,
    /// Live entries with distinct values, compared by equality
    pub number_of_distinct_entries: usize,
}
