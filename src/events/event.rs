//! Cache Event Module
//!
//! Lifecycle events emitted by a cache for every observable state transition.

use std::fmt;

// == Event Type ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEventType {
    Created,
    Updated,
    Removed,
    Evicted,
    Expired,
}

impl fmt::Display for CacheEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheEventType::Created => "CREATED",
            CacheEventType::Updated => "UPDATED",
            CacheEventType::Removed => "REMOVED",
            CacheEventType::Evicted => "EVICTED",
            CacheEventType::Expired => "EXPIRED",
        };
        f.write_str(name)
    }
}

// == Cache Event ==
/// One state transition of one key.
///
/// `old_value` is present for every type except `Created`; `new_value` only
/// for `Created` and `Updated`. The constructors below are the only way to
/// build an event, so that shape always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent<K, V> {
    event_type: CacheEventType,
    key: K,
    old_value: Option<V>,
    new_value: Option<V>,
}

impl<K, V> CacheEvent<K, V> {
    pub fn created(key: K, new_value: V) -> Self {
        Self {
            event_type: CacheEventType::Created,
            key,
            old_value: None,
            new_value: Some(new_value),
        }
    }

    pub fn updated(key: K, old_value: V, new_value: V) -> Self {
        Self {
            event_type: CacheEventType::Updated,
            key,
            old_value: Some(old_value),
            new_value: Some(new_value),
        }
    }

    pub fn removed(key: K, old_value: V) -> Self {
        Self::with_old(CacheEventType::Removed, key, old_value)
    }

    pub fn evicted(key: K, old_value: V) -> Self {
        Self::with_old(CacheEventType::Evicted, key, old_value)
    }

    pub fn expired(key: K, old_value: V) -> Self {
        Self::with_old(CacheEventType::Expired, key, old_value)
    }

    fn with_old(event_type: CacheEventType, key: K, old_value: V) -> Self {
        Self {
            event_type,
            key,
            old_value: Some(old_value),
            new_value: None,
        }
    }

    pub fn event_type(&self) -> CacheEventType {
        self.event_type
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn old_value(&self) -> Option<&V> {
        self.old_value.as_ref()
    }

    pub fn new_value(&self) -> Option<&V> {
        self.new_value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_has_only_new_value() {
        let event = CacheEvent::created("k", 1);
        assert_eq!(event.event_type(), CacheEventType::Created);
        assert_eq!(event.key(), &"k");
        assert_eq!(event.old_value(), None);
        assert_eq!(event.new_value(), Some(&1));
    }

    #[test]
    fn test_updated_has_both_values() {
        let event = CacheEvent::updated("k", 1, 2);
        assert_eq!(event.old_value(), Some(&1));
        assert_eq!(event.new_value(), Some(&2));
    }

    #[test]
    fn test_removals_have_only_old_value() {
        for event in [
            CacheEvent::removed("k", 1),
            CacheEvent::evicted("k", 1),
            CacheEvent::expired("k", 1),
        ] {
            assert_eq!(event.old_value(), Some(&1));
            assert_eq!(event.new_value(), None);
        }
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(CacheEventType::Evicted.to_string(), "EVICTED");
        assert_eq!(CacheEventType::Expired.to_string(), "EXPIRED");
    }
}
