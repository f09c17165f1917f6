//! nscache - A namespace-aware memcache-style cache service
//!
//! Serves the cache service over HTTP on top of an in-process engine.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nscache::api::create_router;
use nscache::{spawn_expiry_task, AppState, CacheManager, Config};

/// Main entry point for the nscache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Obtain the named backing cache and build the service
/// 4. Start background expiry purge task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nscache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting nscache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache={}, namespace={:?}, max_entries={}, port={}, cleanup_interval={}s",
        config.cache_name,
        config.namespace,
        config.max_entries,
        config.server_port,
        config.cleanup_interval
    );

    let manager = CacheManager::new(config.max_entries);
    let state = AppState::from_config(&manager, &config)
        .await
        .context("failed to initialize cache service")?;

    let expiry_handle = spawn_expiry_task(state.service.clone(), config.cleanup_interval);
    info!("Background expiry task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(expiry_handle))
        .await
        .context("server error")?;

    manager.stop().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the expiry task and allows graceful shutdown.
async fn shutdown_signal(expiry_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    expiry_handle.abort();
    warn!("Expiry task aborted");
}
