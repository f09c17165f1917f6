//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::cache::{CacheValue, CasValues, Expiration, IdentifiableValue, RequestContext, SetPolicy};
use crate::error::{CacheError, Result};

/// Query string accepted by every cache endpoint (`?namespace=...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceQuery {
    #[serde(default)]
    pub namespace: Option<String>,
}

impl NamespaceQuery {
    /// Builds the request context, validating the namespace if present.
    pub fn context(&self) -> Result<RequestContext> {
        match &self.namespace {
            Some(ns) => RequestContext::with_namespace(ns.as_str()),
            None => Ok(RequestContext::new()),
        }
    }
}

/// Optional expiration, either relative or absolute but not both
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpiryFields {
    /// Milliseconds from now; negative means already expired
    #[serde(default)]
    pub expires_in_ms: Option<i64>,
    /// Absolute instant (RFC 3339)
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ExpiryFields {
    pub fn expiration(&self) -> Result<Option<Expiration>> {
        match (self.expires_in_ms, self.expires_at) {
            (Some(_), Some(_)) => Err(CacheError::InvalidArgument(
                "Specify only one of expires_in_ms and expires_at".to_string(),
            )),
            (Some(ms), None) => Ok(Some(Expiration::by_delta_millis(ms))),
            (None, Some(at)) => Ok(Some(Expiration::on_date(at))),
            (None, None) => Ok(None),
        }
    }
}

fn parse_policy(policy: Option<&str>) -> Result<SetPolicy> {
    policy.map_or(Ok(SetPolicy::default()), |p| p.parse())
}

/// Request body for PUT /cache/:key
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    pub value: CacheValue,
    /// SET_ALWAYS (default), ADD_ONLY_IF_NOT_PRESENT or REPLACE_ONLY_IF_PRESENT
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(flatten)]
    pub expiry: ExpiryFields,
}

impl PutRequest {
    pub fn policy(&self) -> Result<SetPolicy> {
        parse_policy(self.policy.as_deref())
    }
}

/// Request body for POST /cache/:key/increment
#[derive(Debug, Clone, Deserialize)]
pub struct IncrementRequest {
    pub delta: i64,
    #[serde(default)]
    pub initial_value: Option<i64>,
}

/// Request body for POST /cache/:key/cas
#[derive(Debug, Clone, Deserialize)]
pub struct CasRequest {
    /// Value previously read; null means the key was absent
    #[serde(default)]
    pub expected: Option<CacheValue>,
    pub value: CacheValue,
    #[serde(flatten)]
    pub expiry: ExpiryFields,
}

impl CasRequest {
    pub fn identifiable(&self) -> IdentifiableValue {
        IdentifiableValue::new(self.expected.clone())
    }
}

/// Request body for batch endpoints addressing a list of keys
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
}

/// Request body for POST /batch/put
#[derive(Debug, Clone, Deserialize)]
pub struct BatchPutRequest {
    pub entries: HashMap<String, CacheValue>,
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(flatten)]
    pub expiry: ExpiryFields,
}

impl BatchPutRequest {
    pub fn policy(&self) -> Result<SetPolicy> {
        parse_policy(self.policy.as_deref())
    }
}

/// Request body for POST /batch/increment
#[derive(Debug, Clone, Deserialize)]
pub struct BatchIncrementRequest {
    pub offsets: HashMap<String, i64>,
    #[serde(default)]
    pub initial_value: Option<i64>,
}

/// One entry of POST /batch/cas
#[derive(Debug, Clone, Deserialize)]
pub struct CasEntry {
    #[serde(default)]
    pub expected: Option<CacheValue>,
    pub value: CacheValue,
    #[serde(flatten)]
    pub expiry: ExpiryFields,
}

/// Request body for POST /batch/cas
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCasRequest {
    pub entries: HashMap<String, CasEntry>,
    #[serde(flatten)]
    pub expiry: ExpiryFields,
}

impl BatchCasRequest {
    /// Converts the entries into service CAS values.
    pub fn cas_values(self) -> Result<HashMap<String, CasValues>> {
        self.entries
            .into_iter()
            .map(|(key, entry)| {
                let mut cas = CasValues::new(IdentifiableValue::new(entry.expected), entry.value);
                cas.expiration = entry.expiry.expiration()?;
                Ok((key, cas))
            })
            .collect()
    }
}
