//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    BatchCasRequest, BatchIncrementRequest, BatchPutRequest, CasEntry, CasRequest, ExpiryFields,
    IncrementRequest, KeysRequest, NamespaceQuery, PutRequest,
};
pub use responses::{
    ClearResponse, ContainsResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse,
    IdentifiableResponse, IdentifiablesResponse, IncrementResponse, IncrementsResponse,
    KeysResponse, StatsResponse, StoredResponse, ValuesResponse,
};
