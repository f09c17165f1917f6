//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    batch_cas_handler, batch_delete_handler, batch_get_handler, batch_identifiables_handler,
    batch_increment_handler, batch_put_handler, cas_handler, clear_handler, contains_handler,
    delete_handler, get_handler, health_handler, identifiable_handler, increment_handler,
    put_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", axum::routing::delete(clear_handler))
        .route(
            "/cache/:key",
            get(get_handler).put(put_handler).delete(delete_handler),
        )
        .route("/cache/:key/contains", get(contains_handler))
        .route("/cache/:key/increment", post(increment_handler))
        .route("/cache/:key/identifiable", get(identifiable_handler))
        .route("/cache/:key/cas", post(cas_handler))
        .route("/batch/get", post(batch_get_handler))
        .route("/batch/identifiables", post(batch_identifiables_handler))
        .route("/batch/put", post(batch_put_handler))
        .route("/batch/delete", post(batch_delete_handler))
        .route("/batch/increment", post(batch_increment_handler))
        .route("/batch/cas", post(batch_cas_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
