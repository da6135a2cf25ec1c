//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache managers and caches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A cache with this alias is already registered
    #[error("Cache with alias '{alias}' already exists")]
    AliasAlreadyExists { alias: String },

    /// No cache is registered under this alias
    #[error("No cache with alias '{alias}'")]
    NoSuchCache { alias: String },

    /// Key is absent or expired
    #[error("No entry with key {key} in cache '{alias}'")]
    NoSuchCacheEntry { alias: String, key: String },

    /// Cache exists but was created with other key/value types
    #[error("Cache '{alias}' was created with different key or value types")]
    CacheTypeMismatch { alias: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    pub(crate) fn no_such_cache(alias: &str) -> Self {
        CacheError::NoSuchCache {
            alias: alias.to_string(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NoSuchCache { .. } | CacheError::NoSuchCacheEntry { .. } => {
                StatusCode::NOT_FOUND
            }
            CacheError::AliasAlreadyExists { .. } => StatusCode::CONFLICT,
            CacheError::CacheTypeMismatch { .. } => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_alias() {
        let err = CacheError::no_such_cache("users");
        assert_eq!(err.to_string(), "No cache with alias 'users'");

        let err = CacheError::NoSuchCacheEntry {
            alias: "users".to_string(),
            key: "\"42\"".to_string(),
        };
        assert!(err.to_string().contains("\"42\""));
        assert!(err.to_string().contains("users"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CacheError::no_such_cache("a"), StatusCode::NOT_FOUND),
            (
                CacheError::AliasAlreadyExists {
                    alias: "a".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                CacheError::CacheTypeMismatch {
                    alias: "a".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CacheError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
