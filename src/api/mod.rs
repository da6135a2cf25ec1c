//! API Module
//!
//! Read-mostly admin HTTP surface over a [`CacheManager`](crate::CacheManager).
//!
//! Caches are created in code, never over HTTP. A host service builds an
//! [`AppState`] around the manager it populates and mounts [`create_router`]
//! next to its own routes.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /caches` - Size snapshot of every cache
//! - `GET /caches/:alias` - Size snapshot of one cache
//! - `GET /caches/:alias/stats` - Counters of one cache
//! - `DELETE /caches/:alias` - Remove a cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
