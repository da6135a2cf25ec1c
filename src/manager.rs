//! Cache Manager Module
//!
//! Registry of named caches: creation with default merging, typed lookup and
//! orderly teardown of each cache's background tasks.

use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheInfo, CacheKey, CacheOptions, CacheStatsSnapshot, CacheValue};
use crate::config::{Config, DEFAULT_EVENT_QUEUE_CAPACITY, DEFAULT_SWEEP_INTERVAL_MS};
use crate::error::{CacheError, Result};
use crate::events::EventLogger;

/// Type-erased view of a registered cache.
trait ManagedCache: Send + Sync {
    fn info(&self) -> CacheInfo;
    fn stats(&self) -> CacheStatsSnapshot;
    fn stop(&self) -> Vec<JoinHandle<()>>;
    fn release(&self);
    fn as_any(&self) -> &dyn Any;
}

impl<K: CacheKey, V: CacheValue> ManagedCache for Cache<K, V> {
    fn info(&self) -> CacheInfo {
        Cache::info(self)
    }

    fn stats(&self) -> CacheStatsSnapshot {
        Cache::stats(self)
    }

    fn stop(&self) -> Vec<JoinHandle<()>> {
        Cache::stop(self)
    }

    fn release(&self) {
        Cache::release(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// == Cache Manager ==
/// Owns every cache by alias.
///
/// Creating a cache spawns its background tasks, so caches can only be
/// created from within a Tokio runtime.
pub struct CacheManager {
    caches: RwLock<HashMap<String, Box<dyn ManagedCache>>>,
    defaults: CacheOptions,
    sweep_interval: Duration,
    event_queue_capacity: usize,
    log_events: bool,
}

impl CacheManager {
    // == Constructors ==
    /// Creates a manager whose caches fall back to `defaults`.
    pub fn new(defaults: CacheOptions) -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            defaults,
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            log_events: false,
        }
    }

    /// Creates a manager from process configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_cache_options())
            .with_sweep_interval(config.sweep_interval())
            .with_event_queue_capacity(config.event_queue_capacity)
            .with_event_logging(config.log_events)
    }

    /// Upper bound for each cache's expiry sweep period.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_event_queue_capacity(mut self, capacity: usize) -> Self {
        self.event_queue_capacity = capacity;
        self
    }

    /// Attach an [`EventLogger`] to every cache created from now on.
    pub fn with_event_logging(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    pub fn default_options(&self) -> CacheOptions {
        self.defaults
    }

    // == Create ==
    /// Creates and registers a cache.
    ///
    /// Unset fields of `options` are taken from the manager defaults.
    /// Fails with [`CacheError::AliasAlreadyExists`] if the alias is taken,
    /// or [`CacheError::Internal`] when called outside a Tokio runtime.
    pub fn create_cache<K: CacheKey, V: CacheValue>(
        &self,
        alias: &str,
        options: CacheOptions,
    ) -> Result<Cache<K, V>> {
        if Handle::try_current().is_err() {
            warn!("Refusing to create cache '{}': no Tokio runtime", alias);
            return Err(CacheError::Internal(format!(
                "cache '{}' must be created inside a Tokio runtime",
                alias
            )));
        }

        let mut caches = self.caches.write();
        if caches.contains_key(alias) {
            warn!("Refusing to create cache '{}': alias already exists", alias);
            return Err(CacheError::AliasAlreadyExists {
                alias: alias.to_string(),
            });
        }

        let options = options.merge(&self.defaults);
        let cache: Cache<K, V> =
            Cache::start(alias, options, self.sweep_interval, self.event_queue_capacity);
        if self.log_events {
            cache.add_event_listener(EventLogger::new(alias));
        }

        caches.insert(alias.to_string(), Box::new(cache.clone()));
        info!("Created cache '{}' ({} caches registered)", alias, caches.len());
        Ok(cache)
    }

    /// Creates a cache using the manager defaults for every option.
    pub fn create_cache_with_defaults<K: CacheKey, V: CacheValue>(
        &self,
        alias: &str,
    ) -> Result<Cache<K, V>> {
        self.create_cache(alias, CacheOptions::new())
    }

    // == Get ==
    /// Returns a handle to the cache registered under `alias`.
    ///
    /// Fails with [`CacheError::NoSuchCache`] if nothing is registered, or
    /// [`CacheError::CacheTypeMismatch`] if the cache holds other types.
    pub fn get_cache<K: CacheKey, V: CacheValue>(&self, alias: &str) -> Result<Cache<K, V>> {
        let caches = self.caches.read();
        let managed = caches
            .get(alias)
            .ok_or_else(|| CacheError::no_such_cache(alias))?;

        managed
            .as_any()
            .downcast_ref::<Cache<K, V>>()
            .cloned()
            .ok_or_else(|| CacheError::CacheTypeMismatch {
                alias: alias.to_string(),
            })
    }

    pub fn contains_cache(&self, alias: &str) -> bool {
        self.caches.read().contains_key(alias)
    }

    // == Remove ==
    /// Unregisters a cache, stops its background tasks, waits for them and
    /// releases its entries. Unknown aliases are ignored.
    pub async fn remove_cache(&self, alias: &str) {
        let removed = {
            let mut caches = self.caches.write();
            caches.remove(alias)
        };

        let Some(cache) = removed else {
            debug!("Cache '{}' not registered, nothing to remove", alias);
            return;
        };

        for handle in cache.stop() {
            if let Err(err) = handle.await {
                warn!("Background task of cache '{}' ended abnormally: {}", alias, err);
            }
        }
        cache.release();
        info!("Removed cache '{}'", alias);
    }

    /// Removes every registered cache.
    pub async fn shutdown(&self) {
        for alias in self.aliases() {
            self.remove_cache(&alias).await;
        }
    }

    // == Observability ==
    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.caches.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }

    /// Point-in-time size snapshot of every cache, sorted by alias.
    pub fn list_cache_info(&self) -> Vec<CacheInfo> {
        let mut infos: Vec<CacheInfo> = self
            .caches
            .read()
            .values()
            .map(|cache| cache.info())
            .collect();
        infos.sort_by(|a, b| a.alias.cmp(&b.alias));
        infos
    }

    pub fn cache_info(&self, alias: &str) -> Result<CacheInfo> {
        self.caches
            .read()
            .get(alias)
            .map(|cache| cache.info())
            .ok_or_else(|| CacheError::no_such_cache(alias))
    }

    pub fn cache_stats(&self, alias: &str) -> Result<CacheStatsSnapshot> {
        self.caches
            .read()
            .get(alias)
            .map(|cache| cache.stats())
            .ok_or_else(|| CacheError::no_such_cache(alias))
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(CacheOptions::new())
    }
}

impl Drop for CacheManager {
    fn drop(&mut self) {
        // Tasks cannot be awaited here; signalling is enough for them to exit.
        for cache in self.caches.get_mut().values() {
            drop(cache.stop());
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CacheManager {
        CacheManager::new(
            CacheOptions::builder()
                .time_to_live(Duration::from_secs(1))
                .max_entries(10)
                .build(),
        )
    }

    #[tokio::test]
    async fn test_create_applies_defaults_field_by_field() {
        let manager = manager();

        let cache: Cache<String, i32> = manager
            .create_cache("partial", CacheOptions::new().with_max_entries(2))
            .unwrap();

        assert_eq!(cache.options().max_entries(), 2);
        assert_eq!(cache.options().time_to_live(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_duplicate_alias_is_rejected() {
        let manager = manager();
        manager
            .create_cache_with_defaults::<String, i32>("dup")
            .unwrap();

        let result = manager.create_cache_with_defaults::<u64, String>("dup");

        assert!(matches!(result, Err(CacheError::AliasAlreadyExists { .. })));
        // The original cache is untouched
        assert!(manager.get_cache::<String, i32>("dup").is_ok());
    }

    #[tokio::test]
    async fn test_get_with_wrong_types_is_rejected() {
        let manager = manager();
        manager
            .create_cache_with_defaults::<String, i32>("typed")
            .unwrap();

        let result = manager.get_cache::<String, String>("typed");
        assert!(matches!(result, Err(CacheError::CacheTypeMismatch { .. })));
    }

    #[tokio::test]
    async fn test_alias_is_case_sensitive() {
        let manager = manager();
        manager
            .create_cache_with_defaults::<String, i32>("Users")
            .unwrap();

        assert!(matches!(
            manager.get_cache::<String, i32>("users"),
            Err(CacheError::NoSuchCache { .. })
        ));
        assert!(manager
            .create_cache_with_defaults::<String, i32>("users")
            .is_ok());
    }

    #[tokio::test]
    async fn test_remove_cache_unregisters_and_is_idempotent() {
        let manager = manager();
        let cache: Cache<String, i32> = manager.create_cache_with_defaults("gone").unwrap();
        cache.put("k".to_string(), 1);

        manager.remove_cache("gone").await;
        manager.remove_cache("gone").await;
        manager.remove_cache("never-existed").await;

        assert!(!manager.contains_cache("gone"));
        assert_eq!(cache.stats().total_entries, 0);
        // The alias can be reused
        assert!(manager
            .create_cache_with_defaults::<String, i32>("gone")
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_cache_info_sorted_by_alias() {
        let manager = manager();
        let b: Cache<String, i32> = manager.create_cache_with_defaults("b").unwrap();
        let _a: Cache<String, i32> = manager.create_cache_with_defaults("a").unwrap();
        b.put("k1".to_string(), 1);
        b.put("k2".to_string(), 1);

        let infos = manager.list_cache_info();

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].alias, "a");
        assert_eq!(infos[0].number_of_entries, 0);
        assert_eq!(
            infos[1],
            CacheInfo {
                alias: "b".to_string(),
                number_of_entries: 2,
                number_of_distinct_entries: 1,
            }
        );
        assert_eq!(manager.aliases(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_info_and_stats_for_unknown_alias() {
        let manager = manager();
        assert!(matches!(
            manager.cache_info("nope"),
            Err(CacheError::NoSuchCache { .. })
        ));
        assert!(matches!(
            manager.cache_stats("nope"),
            Err(CacheError::NoSuchCache { .. })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_removes_everything() {
        let manager = manager();
        manager
            .create_cache_with_defaults::<String, i32>("one")
            .unwrap();
        manager
            .create_cache_with_defaults::<String, i32>("two")
            .unwrap();

        manager.shutdown().await;

        assert!(manager.aliases().is_empty());
        assert!(manager.list_cache_info().is_empty());
    }

    #[test]
    fn test_create_outside_runtime_is_an_error() {
        let manager = manager();

        let result = manager.create_cache_with_defaults::<String, i32>("no-runtime");

        assert!(matches!(result, Err(CacheError::Internal(_))));
        assert!(!manager.contains_cache("no-runtime"));
    }

    #[test]
    fn test_from_config_uses_configured_defaults() {
        let config = Config {
            default_ttl_secs: 42,
            default_max_entries: 7,
            ..Config::default()
        };

        let manager = CacheManager::from_config(&config);

        assert_eq!(manager.default_options().time_to_live(), Duration::from_secs(42));
        assert_eq!(manager.default_options().max_entries(), 7);
    }
}
