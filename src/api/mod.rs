//! API Module
//!
//! HTTP handlers and routing for the cache service REST API. Every cache
//! endpoint accepts an optional `?namespace=` query parameter.
//!
//! # Endpoints
//! - `GET|PUT|DELETE /cache/:key` - Read, write (with policy/expiry) or delete a key
//! - `GET /cache/:key/contains` - Presence check
//! - `POST /cache/:key/increment` - Atomic counter increment
//! - `GET /cache/:key/identifiable` - Snapshot for compare-and-swap
//! - `POST /cache/:key/cas` - Compare-and-swap against a snapshot
//! - `POST /batch/{get,identifiables,put,delete,increment,cas}` - Batch variants
//! - `DELETE /cache` - Clear the backing cache in every namespace
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
