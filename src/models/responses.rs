//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::{CacheStats, CacheValue};

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: CacheValue,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: CacheValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for GET /cache/:key/identifiable
///
/// `value` is null when the key was absent; echo it back as `expected`.
#[derive(Debug, Clone, Serialize)]
pub struct IdentifiableResponse {
    pub key: String,
    pub value: Option<CacheValue>,
}

/// Response body for conditional writes (PUT /cache/:key, POST /cache/:key/cas)
#[derive(Debug, Clone, Serialize)]
pub struct StoredResponse {
    pub key: String,
    /// False when the policy or CAS check blocked the write
    pub stored: bool,
}

/// Response body for DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    pub deleted: bool,
}

/// Response body for GET /cache/:key/contains
#[derive(Debug, Clone, Serialize)]
pub struct ContainsResponse {
    pub key: String,
    pub present: bool,
}

/// Response body for POST /cache/:key/increment
#[derive(Debug, Clone, Serialize)]
pub struct IncrementResponse {
    pub key: String,
    /// Null when the key was absent and no initial value was given
    pub value: Option<i64>,
}

/// Response body for POST /batch/get
#[derive(Debug, Clone, Serialize)]
pub struct ValuesResponse {
    pub values: HashMap<String, CacheValue>,
}

/// Response body for POST /batch/identifiables
#[derive(Debug, Clone, Serialize)]
pub struct IdentifiablesResponse {
    pub values: HashMap<String, Option<CacheValue>>,
}

/// Response body for batch writes and deletes
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Keys the operation applied to, sorted
    pub keys: Vec<String>,
}

impl KeysResponse {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let mut keys: Vec<String> = keys.into_iter().collect();
        keys.sort();
        Self { keys }
    }
}

/// Response body for POST /batch/increment
#[derive(Debug, Clone, Serialize)]
pub struct IncrementsResponse {
    pub values: HashMap<String, Option<i64>>,
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new(cache_name: &str) -> Self {
        Self {
            message: format!("Cache '{}' cleared in every namespace", cache_name),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub bytes_returned_for_hits: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub item_count: usize,
    pub total_item_bytes: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            bytes_returned_for_hits: stats.bytes_returned_for_hits,
            evictions: stats.evictions,
            expirations: stats.expirations,
            item_count: stats.item_count,
            total_item_bytes: stats.total_item_bytes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
