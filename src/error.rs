//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache service.
///
/// A CAS miss is not an error: conditional writes report it as `false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Unknown set policy name
    #[error("Unsupported policy: {0}")]
    UnsupportedPolicy(String),

    /// Stored value cannot take part in the requested operation
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Missing, empty or oversized argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backing cache cannot be reached or constructed
    #[error("Infrastructure unavailable: {0}")]
    InfrastructureUnavailable(String),

    /// Conditional update kept losing to concurrent writers
    #[error("Contention: {0}")]
    Contention(String),

    /// Key not found (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::UnsupportedPolicy(_)
            | CacheError::InvalidValue(_)
            | CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::InfrastructureUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Contention(_) => StatusCode::CONFLICT,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache service.
pub type Result<T> = std::result::Result<T, CacheError>;
