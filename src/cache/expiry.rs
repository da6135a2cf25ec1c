//! Expiration Policy Module
//!
//! Time-to-live rule shared by lazy (on read) and active (sweep) expiry.

use std::time::{Duration, Instant};

use crate::cache::CacheEntry;

/// Lower bound for the background sweep period
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

// == Expiration Policy ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    time_to_live: Duration,
}

impl ExpirationPolicy {
    pub fn new(time_to_live: Duration) -> Self {
        Self { time_to_live }
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Expiry instant for an entry written at `written_at`.
    pub fn expires_at(&self, written_at: Instant) -> Instant {
        written_at
            .checked_add(self.time_to_live)
            .unwrap_or_else(|| far_future(written_at))
    }

    /// `now >= expires_at`
    pub fn is_expired<V>(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        entry.is_expired_at(now)
    }

    // == Sweep Interval ==
    /// Sweep period for this TTL: the TTL itself, bounded by
    /// [`MIN_SWEEP_INTERVAL`] and `max`.
    pub fn sweep_interval(&self, max: Duration) -> Duration {
        let max = max.max(MIN_SWEEP_INTERVAL);
        self.time_to_live.clamp(MIN_SWEEP_INTERVAL, max)
    }
}

// Instant has no MAX; a century out is never reached in practice.
fn far_future(from: Instant) -> Instant {
    from.checked_add(Duration::from_secs(100 * 365 * 24 * 60 * 60))
        .unwrap_or(from)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at_adds_ttl() {
        let policy = ExpirationPolicy::new(Duration::from_secs(5));
        let now = Instant::now();
        assert_eq!(policy.expires_at(now), now + Duration::from_secs(5));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let policy = ExpirationPolicy::new(Duration::MAX);
        let now = Instant::now();
        assert!(policy.expires_at(now) > now);
    }

    #[test]
    fn test_is_expired_uses_entry_deadline() {
        let policy = ExpirationPolicy::new(Duration::from_millis(100));
        let now = Instant::now();
        let entry = CacheEntry::new("v", now, policy.expires_at(now), 0);

        assert!(!policy.is_expired(&entry, now));
        assert!(policy.is_expired(&entry, now + Duration::from_millis(100)));
    }

    #[test]
    fn test_sweep_interval_bounds() {
        let max = Duration::from_secs(1);

        let tiny = ExpirationPolicy::new(Duration::from_millis(1));
        assert_eq!(tiny.sweep_interval(max), MIN_SWEEP_INTERVAL);

        let mid = ExpirationPolicy::new(Duration::from_millis(250));
        assert_eq!(mid.sweep_interval(max), Duration::from_millis(250));

        let long = ExpirationPolicy::new(Duration::from_secs(3600));
        assert_eq!(long.sweep_interval(max), max);
    }

    #[test]
    fn test_sweep_interval_with_max_below_floor() {
        let policy = ExpirationPolicy::new(Duration::from_secs(60));
        assert_eq!(policy.sweep_interval(Duration::ZERO), MIN_SWEEP_INTERVAL);
    }
}
