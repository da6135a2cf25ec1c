//! Event Listener Module
//!
//! The listener capability plus the two stock implementations: closures and
//! a tracing-based event logger.

use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::info;

use crate::events::{CacheEvent, CacheEventType};

// == Listener Trait ==
/// Receives the ordered event stream of one cache.
///
/// Called from the cache's dispatch worker, never from the mutating thread.
/// Errors and panics are logged by the worker and do not reach the cache.
pub trait CacheEventListener<K, V>: Send + Sync {
    fn on_event(&self, event: &CacheEvent<K, V>) -> anyhow::Result<()>;
}

// == Closure Listener ==
/// Adapts a closure into a [`CacheEventListener`].
pub struct FnListener<K, V, F> {
    f: F,
    _types: PhantomData<fn(&CacheEvent<K, V>)>,
}

/// Wraps `f` so it can be passed to
/// [`Cache::add_event_listener`](crate::Cache::add_event_listener).
pub fn listener_fn<K, V, F>(f: F) -> FnListener<K, V, F>
where
    F: Fn(&CacheEvent<K, V>) -> anyhow::Result<()> + Send + Sync,
{
    FnListener {
        f,
        _types: PhantomData,
    }
}

impl<K, V, F> CacheEventListener<K, V> for FnListener<K, V, F>
where
    F: Fn(&CacheEvent<K, V>) -> anyhow::Result<()> + Send + Sync,
{
    fn on_event(&self, event: &CacheEvent<K, V>) -> anyhow::Result<()> {
        (self.f)(event)
    }
}

// == Event Logger ==
/// Logs every event of one cache at `info` level.
#[derive(Debug, Clone)]
pub struct EventLogger {
    alias: String,
}

impl EventLogger {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl<K: Debug, V: Debug> CacheEventListener<K, V> for EventLogger {
    fn on_event(&self, event: &CacheEvent<K, V>) -> anyhow::Result<()> {
        let alias = &self.alias;
        let key = event.key();
        match event.event_type() {
            CacheEventType::Created => info!(
                "Cache entry in '{}' with key={:?} created with value={:?}",
                alias,
                key,
                event.new_value()
            ),
            CacheEventType::Updated => info!(
                "Cache entry in '{}' with key={:?} updated from {:?} to {:?}",
                alias,
                key,
                event.old_value(),
                event.new_value()
            ),
            CacheEventType::Removed => {
                info!("Cache entry in '{}' with key={:?} removed", alias, key)
            }
            CacheEventType::Evicted => {
                info!("Cache entry in '{}' with key={:?} evicted", alias, key)
            }
            CacheEventType::Expired => {
                info!("Cache entry in '{}' with key={:?} expired", alias, key)
            }
        }
        Ok(())
    }
}
