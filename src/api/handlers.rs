//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint. Every cache
//! handler takes the namespace from the `namespace` query parameter.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::CacheService;
use crate::config::Config;
use crate::engine::CacheManager;
use crate::error::{CacheError, Result};
use crate::models::{
    BatchCasRequest, BatchIncrementRequest, BatchPutRequest, CasRequest, ClearResponse,
    ContainsResponse, DeleteResponse, GetResponse, HealthResponse, IdentifiableResponse,
    IdentifiablesResponse, IncrementRequest, IncrementResponse, IncrementsResponse,
    KeysRequest, KeysResponse, NamespaceQuery, PutRequest, StatsResponse, StoredResponse,
    ValuesResponse,
};

/// Application state shared across all handlers.
///
/// The service is cheap to clone; all clones share one backing cache.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: CacheService,
}

impl AppState {
    /// Creates a new AppState with the given cache service.
    pub fn new(service: CacheService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Obtains the configured backing cache from `manager`.
    pub async fn from_config(manager: &CacheManager, config: &Config) -> Result<Self> {
        Ok(Self::new(CacheService::from_manager(manager, config).await?))
    }
}

// == Single Key ==

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<GetResponse>> {
    let ctx = query.context()?;
    match state.service.get(&ctx, &key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for PUT /cache/:key
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<PutRequest>,
) -> Result<Json<StoredResponse>> {
    let ctx = query.context()?;
    let policy = req.policy()?;
    let expiration = req.expiry.expiration()?;

    let stored = state
        .service
        .put(&ctx, &key, req.value, expiration, policy)
        .await?;

    Ok(Json(StoredResponse { key, stored }))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<DeleteResponse>> {
    let ctx = query.context()?;
    let deleted = state.service.delete(&ctx, &key).await?;
    Ok(Json(DeleteResponse { key, deleted }))
}

/// Handler for GET /cache/:key/contains
pub async fn contains_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<ContainsResponse>> {
    let ctx = query.context()?;
    let present = state.service.contains(&ctx, &key).await?;
    Ok(Json(ContainsResponse { key, present }))
}

/// Handler for POST /cache/:key/increment
pub async fn increment_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<IncrementRequest>,
) -> Result<Json<IncrementResponse>> {
    let ctx = query.context()?;
    let value = state
        .service
        .increment(&ctx, &key, req.delta, req.initial_value)
        .await?;
    Ok(Json(IncrementResponse { key, value }))
}

/// Handler for GET /cache/:key/identifiable
pub async fn identifiable_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<IdentifiableResponse>> {
    let ctx = query.context()?;
    let snapshot = state.service.get_identifiable(&ctx, &key).await?;
    Ok(Json(IdentifiableResponse {
        key,
        value: snapshot.value().cloned(),
    }))
}

/// Handler for POST /cache/:key/cas
pub async fn cas_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<CasRequest>,
) -> Result<Json<StoredResponse>> {
    let ctx = query.context()?;
    let expiration = req.expiry.expiration()?;
    let old = req.identifiable();

    let stored = state
        .service
        .put_if_untouched(&ctx, &key, &old, req.value, expiration)
        .await?;

    Ok(Json(StoredResponse { key, stored }))
}

// == Batch ==

/// Handler for POST /batch/get
pub async fn batch_get_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<ValuesResponse>> {
    let ctx = query.context()?;
    let values = state.service.get_all(&ctx, &req.keys).await?;
    Ok(Json(ValuesResponse { values }))
}

/// Handler for POST /batch/identifiables
pub async fn batch_identifiables_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<IdentifiablesResponse>> {
    let ctx = query.context()?;
    let values = state
        .service
        .get_identifiables(&ctx, &req.keys)
        .await?
        .into_iter()
        .map(|(key, snapshot)| (key, snapshot.value().cloned()))
        .collect();
    Ok(Json(IdentifiablesResponse { values }))
}

/// Handler for POST /batch/put
pub async fn batch_put_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<BatchPutRequest>,
) -> Result<Json<KeysResponse>> {
    let ctx = query.context()?;
    let policy = req.policy()?;
    let expiration = req.expiry.expiration()?;

    let written = state
        .service
        .put_all(&ctx, req.entries, expiration, policy)
        .await?;
    Ok(Json(KeysResponse::new(written)))
}

/// Handler for POST /batch/delete
pub async fn batch_delete_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<KeysResponse>> {
    let ctx = query.context()?;
    let removed = state.service.delete_all(&ctx, &req.keys).await?;
    Ok(Json(KeysResponse::new(removed)))
}

/// Handler for POST /batch/increment
pub async fn batch_increment_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<BatchIncrementRequest>,
) -> Result<Json<IncrementsResponse>> {
    let ctx = query.context()?;
    let values = state
        .service
        .increment_all_offsets(&ctx, req.offsets, req.initial_value)
        .await?;
    Ok(Json(IncrementsResponse { values }))
}

/// Handler for POST /batch/cas
pub async fn batch_cas_handler(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
    Json(req): Json<BatchCasRequest>,
) -> Result<Json<KeysResponse>> {
    let ctx = query.context()?;
    let expiration = req.expiry.expiration()?;
    let values = req.cas_values()?;

    let swapped = state
        .service
        .put_if_untouched_all(&ctx, values, expiration)
        .await?;
    Ok(Json(KeysResponse::new(swapped)))
}

// == Backing Store ==

/// Handler for DELETE /cache
///
/// Clears the whole backing cache, every namespace included.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.service.clear_all().await?;
    Ok(Json(ClearResponse::new(state.service.cache_name())))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.service.statistics().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
