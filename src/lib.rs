//! Named Cache - in-memory named caches with lifecycle events
//!
//! A [`CacheManager`] owns independently configured [`Cache`]s, each bounded
//! by a maximum entry count and a time-to-live, and each emitting an ordered
//! stream of [`CacheEvent`]s to registered listeners.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheInfo, CacheOptions, CacheStatsSnapshot};
pub use config::Config;
pub use error::{CacheError, Result};
pub use events::{listener_fn, CacheEvent, CacheEventListener, CacheEventType, EventLogger};
pub use manager::CacheManager;
