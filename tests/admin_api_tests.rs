//! Integration Tests for the Admin API
//!
//! Drives the router through full request/response cycles against a
//! manager with live caches.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower::ServiceExt;

use named_cache::{api::create_router, AppState, Cache, CacheManager, CacheOptions};

// == Helper Functions ==

fn create_test_app() -> (Arc<CacheManager>, Router) {
    let manager = Arc::new(CacheManager::new(CacheOptions::new()));
    let app = create_router(AppState::new(manager.clone()));
    (manager, app)
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Listing ==

#[tokio::test]
async fn test_list_caches_sorted_with_sizes() {
    let (manager, app) = create_test_app();
    let users: Cache<String, i32> = manager.create_cache_with_defaults("users").unwrap();
    let _orders: Cache<String, i32> = manager.create_cache_with_defaults("orders").unwrap();
    users.put_keys(vec!["a".to_string(), "b".to_string()], 1);
    users.put("c".to_string(), 2);

    let (status, json) = send(app, "GET", "/caches").await;

    assert_eq!(status, StatusCode::OK);
    let caches = json["caches"].as_array().unwrap();
    assert_eq!(caches.len(), 2);
    assert_eq!(caches[0]["alias"], "orders");
    assert_eq!(caches[0]["number_of_entries"], 0);
    assert_eq!(caches[1]["alias"], "users");
    assert_eq!(caches[1]["number_of_entries"], 3);
    assert_eq!(caches[1]["number_of_distinct_entries"], 2);
    assert!(json["generated_at"].is_string());
}

// == Single Cache ==

#[tokio::test]
async fn test_cache_info_endpoint() {
    let (manager, app) = create_test_app();
    let cache: Cache<u64, String> = manager.create_cache_with_defaults("names").unwrap();
    cache.put(1, "ada".to_string());

    let (status, json) = send(app, "GET", "/caches/names").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["alias"], "names");
    assert_eq!(json["number_of_entries"], 1);
}

#[tokio::test]
async fn test_cache_info_unknown_alias() {
    let (_manager, app) = create_test_app();

    let (status, json) = send(app, "GET", "/caches/ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No cache with alias 'ghost'");
}

#[tokio::test]
async fn test_cache_stats_endpoint() {
    let (manager, app) = create_test_app();
    let cache: Cache<String, i32> = manager.create_cache_with_defaults("stats").unwrap();
    cache.put("k".to_string(), 1);
    cache.get(&"k".to_string()).unwrap();
    assert!(cache.get_optional(&"missing".to_string()).is_none());

    let (status, json) = send(app, "GET", "/caches/stats/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["alias"], "stats");
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["hit_rate"], 0.5);
}

// == Removal ==

#[tokio::test]
async fn test_delete_cache_endpoint() {
    let (manager, app) = create_test_app();
    manager
        .create_cache_with_defaults::<String, i32>("temp")
        .unwrap();

    let (status, json) = send(app.clone(), "DELETE", "/caches/temp").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], true);
    assert!(!manager.contains_cache("temp"));

    let (status, json) = send(app, "DELETE", "/caches/temp").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], false);
}

// == Health ==

#[tokio::test]
async fn test_health_counts_caches() {
    let (manager, app) = create_test_app();
    manager
        .create_cache_with_defaults::<String, i32>("one")
        .unwrap();

    let (status, json) = send(app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["caches"], 1);
}

// == Embedding ==

#[tokio::test]
async fn test_router_mounts_next_to_host_routes() {
    let (manager, admin) = create_test_app();
    let sessions: Cache<String, i32> = manager.create_cache_with_defaults("sessions").unwrap();
    sessions.put("s1".to_string(), 1);
    let app = Router::new()
        .route("/app/ping", get(|| async { Json(serde_json::json!({ "pong": true })) }))
        .merge(admin);

    let (status, json) = send(app.clone(), "GET", "/app/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pong"], true);

    let (status, json) = send(app, "GET", "/caches/sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["number_of_entries"], 1);
}
