//! nscache - A namespace-aware memcache-style cache service
//!
//! Layers get/put/delete, conditional writes, compare-and-swap, batches and
//! counters over a shared cache engine, scoping every key by namespace so
//! tenants can share one backing cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{
    CacheService, CacheStats, CacheValue, CasValues, Expiration, IdentifiableValue,
    RequestContext, SetPolicy,
};
pub use config::Config;
pub use engine::{CacheManager, DistributedMap, LocalMap};
pub use error::{CacheError, Result};
pub use tasks::spawn_expiry_task;
