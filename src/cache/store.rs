//! Cache Store Module
//!
//! Main cache engine combining concurrent map storage with LRU tracking, TTL
//! expiration and ordered lifecycle events.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{
    CacheEntry, CacheInfo, CacheKey, CacheOptions, CacheStats, CacheStatsSnapshot, CacheValue,
    ExpirationPolicy, LruTracker,
};
use crate::error::{CacheError, Result};
use crate::events::{CacheEvent, CacheEventListener, EventBus};
use crate::tasks::{spawn_dispatch_worker, spawn_sweep_task, Sweepable};

// == Cache ==
/// Handle to one named cache.
///
/// Cloning is cheap and every clone operates on the same entries, so a
/// handle can be shared freely between threads and tasks.
pub struct Cache<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K: CacheKey, V: CacheValue> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("alias", &self.shared.alias)
            .field("entries", &self.shared.entries.len())
            .finish()
    }
}

/// Locking order: entry shard, then `lru`. `capacity` is only ever taken
/// with no shard held.
pub(crate) struct Shared<K, V> {
    alias: String,
    options: CacheOptions,
    expiration: ExpirationPolicy,
    entries: DashMap<K, CacheEntry<V>>,
    lru: Mutex<LruTracker<K>>,
    capacity: Mutex<()>,
    bus: EventBus<K, V>,
    stats: CacheStats,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Outcome of writing one key.
enum Upsert {
    Inserted,
    Replaced,
}

enum Lookup<V> {
    Hit(V),
    Stale,
    Missing,
}

impl<K: CacheKey, V: CacheValue> Cache<K, V> {
    // == Constructor ==
    /// Creates a cache and starts its dispatch worker and TTL sweep.
    ///
    /// `options` must already be merged with the manager defaults.
    /// Must be called from within a Tokio runtime.
    pub(crate) fn start(
        alias: impl Into<String>,
        options: CacheOptions,
        max_sweep_interval: Duration,
        event_queue_capacity: usize,
    ) -> Self {
        let alias = alias.into();
        let expiration = ExpirationPolicy::new(options.time_to_live());
        let (bus, receiver) = EventBus::new(alias.clone(), event_queue_capacity);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let listeners = bus.listeners();

        let shared = Arc::new(Shared {
            alias: alias.clone(),
            options,
            expiration,
            entries: DashMap::new(),
            lru: Mutex::new(LruTracker::new()),
            capacity: Mutex::new(()),
            bus,
            stats: CacheStats::new(),
            shutdown,
            tasks: Mutex::new(Vec::with_capacity(2)),
        });

        let dispatch =
            spawn_dispatch_worker(alias.clone(), receiver, listeners, shutdown_rx.clone());
        let sweep = spawn_sweep_task(
            Arc::downgrade(&shared),
            expiration.sweep_interval(max_sweep_interval),
            shutdown_rx,
        );
        shared.tasks.lock().extend([dispatch, sweep]);

        info!(
            "Cache '{}' started: time_to_live={:?}, max_entries={}",
            alias,
            options.time_to_live(),
            options.max_entries()
        );

        Self { shared }
    }

    pub fn alias(&self) -> &str {
        &self.shared.alias
    }

    /// Effective options after merging with the manager defaults.
    pub fn options(&self) -> CacheOptions {
        self.shared.options
    }

    // == Put ==
    /// Stores a value, emitting `Created` for a new key or `Updated` for an
    /// existing one. Evicts least recently used entries if the cache grew
    /// beyond capacity.
    pub fn put(&self, key: K, value: V) {
        if let Upsert::Inserted = self.shared.upsert(key, value) {
            self.shared.enforce_capacity();
        }
    }

    /// Writes the same value under every key, then enforces capacity once.
    pub fn put_keys<I>(&self, keys: I, value: V)
    where
        I: IntoIterator<Item = K>,
    {
        let mut grew = false;
        for key in keys {
            grew |= matches!(self.shared.upsert(key, value.clone()), Upsert::Inserted);
        }
        if grew {
            self.shared.enforce_capacity();
        }
    }

    /// Upserts every pair, then enforces capacity once.
    pub fn put_entries<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut grew = false;
        for (key, value) in entries {
            grew |= matches!(self.shared.upsert(key, value), Upsert::Inserted);
        }
        if grew {
            self.shared.enforce_capacity();
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Fails with [`CacheError::NoSuchCacheEntry`] if the key is absent or expired.
    pub fn get(&self, key: &K) -> Result<V> {
        self.shared
            .lookup(key)
            .ok_or_else(|| CacheError::NoSuchCacheEntry {
                alias: self.shared.alias.clone(),
                key: format!("{:?}", key),
            })
    }

    /// Like [`Cache::get`] but returns `None` for a missing key.
    pub fn get_optional(&self, key: &K) -> Option<V> {
        self.shared.lookup(key)
    }

    /// Values of the present, unexpired keys, in input order. Missing keys
    /// are skipped.
    pub fn get_many<'a, I>(&self, keys: I) -> Vec<V>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter()
            .filter_map(|key| self.shared.lookup(key))
            .collect()
    }

    /// True only if the key is present and not stale. Does not count as a
    /// use for eviction purposes.
    pub fn contains_key(&self, key: &K) -> bool {
        let now = Instant::now();
        let stale = match self.shared.entries.get(key) {
            None => return false,
            Some(entry) => entry.is_expired_at(now),
        };
        if stale {
            self.shared.expire(key);
        }
        !stale
    }

    // == Remove ==
    /// Removes a key, emitting `Removed`. Absent keys are a no-op.
    pub fn remove(&self, key: &K) {
        self.shared.remove(key);
    }

    pub fn remove_many<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        for key in keys {
            self.shared.remove(key);
        }
    }

    // == Scans ==
    /// Every live value, one per key.
    pub fn get_all(&self) -> Vec<V> {
        self.shared.live_values()
    }

    /// Every live value, deduplicated by equality.
    pub fn get_all_distinct(&self) -> Vec<V> {
        let mut seen = HashSet::new();
        self.shared
            .live_values()
            .into_iter()
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }

    /// Number of live (unexpired) entries.
    pub fn number_of_entries(&self) -> usize {
        let now = Instant::now();
        self.shared
            .entries
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    /// Number of distinct live values.
    pub fn number_of_distinct_values(&self) -> usize {
        let now = Instant::now();
        let mut seen = HashSet::new();
        for entry in self.shared.entries.iter() {
            if !entry.is_expired_at(now) {
                seen.insert(entry.value.clone());
            }
        }
        seen.len()
    }

    // == Clear ==
    /// Removes every entry without emitting per-key events.
    pub fn clear(&self) {
        self.shared.clear();
        debug!("Cache '{}' cleared", self.shared.alias);
    }

    // == Events ==
    /// Registers a listener for all events emitted from now on.
    pub fn add_event_listener<L>(&self, listener: L)
    where
        L: CacheEventListener<K, V> + 'static,
    {
        self.add_shared_event_listener(Arc::new(listener));
    }

    pub fn add_shared_event_listener(&self, listener: Arc<dyn CacheEventListener<K, V>>) {
        self.shared.bus.subscribe(listener);
    }

    // == Observability ==
    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            alias: self.shared.alias.clone(),
            number_of_entries: self.number_of_entries(),
            number_of_distinct_entries: self.number_of_distinct_values(),
        }
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.shared
            .stats
            .snapshot(self.shared.entries.len(), self.shared.bus.dropped_events())
    }

    /// Runs one active expiry pass now, returning how many entries expired.
    pub fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }

    // == Teardown ==
    /// Signals the background tasks to stop and hands back their handles.
    pub(crate) fn stop(&self) -> Vec<JoinHandle<()>> {
        self.shared.shutdown.send_replace(true);
        std::mem::take(&mut *self.shared.tasks.lock())
    }

    /// Drops every entry; only called once the background tasks are done.
    pub(crate) fn release(&self) {
        self.shared.clear();
    }
}

impl<K: CacheKey, V: CacheValue> Shared<K, V> {
    fn upsert(&self, key: K, value: V) -> Upsert {
        let now = Instant::now();
        let expires_at = self.expiration.expires_at(now);

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let key = occupied.key().clone();
                let entry = occupied.get_mut();
                let stale = self.expiration.is_expired(&*entry, now);

                entry.tick = self.lru.lock().refresh(entry.tick, key.clone());
                entry.created_at = if stale { now } else { entry.created_at };
                let old = entry.replace(value.clone(), expires_at);

                if stale {
                    self.stats.record_expiration();
                    self.bus.publish(CacheEvent::expired(key.clone(), old));
                    self.bus.publish(CacheEvent::created(key, value));
                } else {
                    self.bus.publish(CacheEvent::updated(key, old, value));
                }
                Upsert::Replaced
            }
            Entry::Vacant(vacant) => {
                let key = vacant.key().clone();
                let tick = self.lru.lock().record(key.clone());
                vacant.insert(CacheEntry::new(value.clone(), now, expires_at, tick));
                self.bus.publish(CacheEvent::created(key, value));
                Upsert::Inserted
            }
        }
    }

    fn lookup(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let found = match self.entries.get_mut(key) {
            None => Lookup::Missing,
            Some(mut entry) => {
                if self.expiration.is_expired(&*entry, now) {
                    Lookup::Stale
                } else {
                    entry.tick = self.lru.lock().refresh(entry.tick, key.clone());
                    Lookup::Hit(entry.value.clone())
                }
            }
        };

        match found {
            Lookup::Hit(value) => {
                self.stats.record_hit();
                Some(value)
            }
            Lookup::Stale => {
                self.expire(key);
                self.stats.record_miss();
                None
            }
            Lookup::Missing => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Removes `key` if it is stale, emitting `Expired`.
    ///
    /// Lazy and active expiry both end up here; whichever reaches the entry
    /// first removes it, the other finds it gone or fresh and does nothing.
    fn expire(&self, key: &K) -> bool {
        let now = Instant::now();
        if let Entry::Occupied(occupied) = self.entries.entry(key.clone()) {
            if self.expiration.is_expired(occupied.get(), now) {
                let (key, entry) = occupied.remove_entry();
                self.lru.lock().forget(entry.tick);
                self.stats.record_expiration();
                self.bus.publish(CacheEvent::expired(key, entry.value));
                return true;
            }
        }
        false
    }

    fn remove(&self, key: &K) {
        if let Entry::Occupied(occupied) = self.entries.entry(key.clone()) {
            let stale = self.expiration.is_expired(occupied.get(), Instant::now());
            let (key, entry) = occupied.remove_entry();
            self.lru.lock().forget(entry.tick);

            if stale {
                self.stats.record_expiration();
                self.bus.publish(CacheEvent::expired(key, entry.value));
            } else {
                self.bus.publish(CacheEvent::removed(key, entry.value));
            }
        }
    }

    // == Capacity Enforcement ==
    /// Evicts least recently used entries until the store fits its capacity.
    fn enforce_capacity(&self) {
        let max_entries = self.options.max_entries();
        let _guard = self.capacity.lock();

        while self.entries.len() > max_entries {
            let oldest = self.lru.lock().pop_oldest();
            let Some((tick, victim)) = oldest else {
                break;
            };

            let Entry::Occupied(occupied) = self.entries.entry(victim) else {
                continue;
            };
            // Touched since we popped it; it is queued again under a newer tick
            if occupied.get().tick != tick {
                continue;
            }

            let stale = self.expiration.is_expired(occupied.get(), Instant::now());
            let (key, entry) = occupied.remove_entry();
            if stale {
                self.stats.record_expiration();
                self.bus.publish(CacheEvent::expired(key, entry.value));
            } else {
                debug!("Cache '{}' evicting {:?}", self.alias, key);
                self.stats.record_eviction();
                self.bus.publish(CacheEvent::evicted(key, entry.value));
            }
        }
    }

    fn live_values(&self) -> Vec<V> {
        let now = Instant::now();
        let mut values = Vec::new();
        let mut stale = Vec::new();

        for entry in self.entries.iter() {
            if entry.is_expired_at(now) {
                stale.push(entry.key().clone());
            } else {
                values.push(entry.value.clone());
            }
        }

        for key in &stale {
            self.expire(key);
        }
        values
    }

    fn clear(&self) {
        let _guard = self.capacity.lock();
        // Tracker first: a concurrent insert can then at worst leave an
        // orphan tick, which eviction skips.
        self.lru.lock().clear();
        self.entries.clear();
    }
}

impl<K: CacheKey, V: CacheValue> Sweepable for Shared<K, V> {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let stale: Vec<K> = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key().clone())
            .collect();

        stale.iter().filter(|key| self.expire(key)).count()
    }
}
