//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheInfo;
use crate::config::Config;
use crate::error::Result;
use crate::manager::CacheManager;
use crate::models::{CacheListResponse, HealthResponse, RemoveCacheResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<CacheManager>,
}

impl AppState {
    pub fn new(manager: Arc<CacheManager>) -> Self {
        Self { manager }
    }

    /// Creates a new AppState with a manager built from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(CacheManager::from_config(config)))
    }
}

/// Handler for GET /caches
pub async fn list_caches_handler(State(state): State<AppState>) -> Json<CacheListResponse> {
    Json(CacheListResponse::new(state.manager.list_cache_info()))
}

/// Handler for GET /caches/:alias
pub async fn cache_info_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Result<Json<CacheInfo>> {
    let info = state.manager.cache_info(&alias)?;
    Ok(Json(info))
}

/// Handler for GET /caches/:alias/stats
pub async fn cache_stats_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Result<Json<StatsResponse>> {
    let stats = state.manager.cache_stats(&alias)?;
    Ok(Json(StatsResponse::new(alias, stats)))
}

/// Handler for DELETE /caches/:alias
///
/// Removing an unknown alias is not an error.
pub async fn remove_cache_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> Json<RemoveCacheResponse> {
    let registered = state.manager.contains_cache(&alias);
    state.manager.remove_cache(&alias).await;
    Json(RemoveCacheResponse::new(&alias, registered))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.manager.aliases().len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheOptions};
    use crate::error::CacheError;

    fn test_state() -> AppState {
        AppState::new(Arc::new(CacheManager::new(CacheOptions::new())))
    }

    #[tokio::test]
    async fn test_cache_info_handler() {
        let state = test_state();
        let cache: Cache<String, i32> = state
            .manager
            .create_cache_with_defaults("users")
            .unwrap();
        cache.put("a".to_string(), 1);

        let response = cache_info_handler(State(state), Path("users".to_string()))
            .await
            .unwrap();
        assert_eq!(response.number_of_entries, 1);
    }

    #[tokio::test]
    async fn test_cache_info_handler_unknown_alias() {
        let result = cache_info_handler(State(test_state()), Path("nope".to_string())).await;
        assert!(matches!(result, Err(CacheError::NoSuchCache { .. })));
    }

    #[tokio::test]
    async fn test_remove_cache_handler() {
        let state = test_state();
        state
            .manager
            .create_cache_with_defaults::<String, i32>("temp")
            .unwrap();

        let response = remove_cache_handler(State(state.clone()), Path("temp".to_string())).await;
        assert!(response.removed);
        assert!(!state.manager.contains_cache("temp"));

        let response = remove_cache_handler(State(state), Path("temp".to_string())).await;
        assert!(!response.removed);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.caches, 0);
    }
}
