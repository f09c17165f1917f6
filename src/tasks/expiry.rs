//! Expiry Purge Task
//!
//! Background task that periodically evicts expired entries from the
//! backing cache. Reads already hide expired entries; this reclaims them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheService;
use crate::error::CacheError;

/// Spawns a background task that periodically purges expired entries.
///
/// The task sleeps for `interval_secs` between runs and stops on its own
/// once the backing cache reports it is unavailable.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_expiry_task(service.clone(), 1);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_expiry_task(service: CacheService, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry purge task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match service.purge_expired().await {
                Ok(0) => debug!("Expiry purge: no expired entries found"),
                Ok(removed) => info!("Expiry purge: removed {} expired entries", removed),
                Err(CacheError::InfrastructureUnavailable(reason)) => {
                    warn!("Expiry purge stopping: {}", reason);
                    break;
                }
                Err(err) => warn!("Expiry purge failed: {}", err),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Expiration, RequestContext, SetPolicy};
    use crate::engine::{CacheManager, LocalMap};
    use crate::config::Config;
    use std::sync::Arc;

    fn service() -> CacheService {
        CacheService::new(Arc::new(LocalMap::new("memcache", 0)), None).unwrap()
    }

    #[tokio::test]
    async fn test_expiry_task_reclaims_expired_entries() {
        let svc = service();
        let ctx = RequestContext::new();
        svc.put(
            &ctx,
            "expire_soon",
            "value",
            Some(Expiration::by_delta_millis(200)),
            SetPolicy::SetAlways,
        )
        .await
        .unwrap();
        svc.set(&ctx, "long_lived", "value").await.unwrap();

        let handle = spawn_expiry_task(svc.clone(), 1);

        // Wait for entry to expire and the purge to run
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let stats = svc.statistics().await.unwrap();
        assert_eq!(stats.item_count, 1, "Expired entry should have been purged");
        assert_eq!(stats.expirations, 1);
        assert!(svc.contains(&ctx, "long_lived").await.unwrap());

        handle.abort();
    }

    #[tokio::test]
    async fn test_expiry_task_stops_when_cache_unavailable() {
        let manager = CacheManager::default();
        let svc = CacheService::from_manager(&manager, &Config::default())
            .await
            .unwrap();
        manager.stop().await;

        let handle = spawn_expiry_task(svc, 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(handle.is_finished(), "Task should end once the cache is stopped");
    }

    #[tokio::test]
    async fn test_expiry_task_can_be_aborted() {
        let handle = spawn_expiry_task(service(), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
