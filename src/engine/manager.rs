//! Cache Manager Module
//!
//! Registry of named engine instances.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::engine::LocalMap;
use crate::error::{CacheError, Result};

// == Cache Manager ==
/// Obtains or creates named [`LocalMap`] instances.
#[derive(Debug)]
pub struct CacheManager {
    caches: RwLock<HashMap<String, Arc<LocalMap>>>,
    /// Capacity given to newly created caches, 0 = unbounded
    max_entries: usize,
    running: AtomicBool,
}

impl CacheManager {
    pub fn new(max_entries: usize) -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            max_entries,
            running: AtomicBool::new(true),
        }
    }

    // == Get Cache ==
    /// Returns the cache called `name`, creating it when `create` is set.
    pub async fn get_cache(&self, name: &str, create: bool) -> Result<Arc<LocalMap>> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(CacheError::InfrastructureUnavailable(
                "cache manager is stopped".to_string(),
            ));
        }

        if let Some(cache) = self.caches.read().await.get(name) {
            return Ok(cache.clone());
        }
        if !create {
            return Err(CacheError::InfrastructureUnavailable(format!(
                "cache '{}' is not defined",
                name
            )));
        }

        let mut caches = self.caches.write().await;
        let cache = caches
            .entry(name.to_string())
            .or_insert_with(|| {
                info!(cache = name, max_entries = self.max_entries, "created cache");
                Arc::new(LocalMap::new(name, self.max_entries))
            })
            .clone();
        Ok(cache)
    }

    /// Names of all caches created so far.
    pub async fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    // == Stop ==
    /// Stops the manager and every cache it created.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        for cache in self.caches.read().await.values() {
            cache.stop();
        }
        info!("cache manager stopped");
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DistributedMap;

    #[tokio::test]
    async fn test_get_cache_creates_once() {
        let manager = CacheManager::default();

        let first = manager.get_cache("memcache", true).await.unwrap();
        let second = manager.get_cache("memcache", true).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "memcache");
        assert_eq!(manager.cache_names().await, vec!["memcache".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_cache_without_create() {
        let manager = CacheManager::default();

        assert!(matches!(
            manager.get_cache("nope", false).await,
            Err(CacheError::InfrastructureUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_makes_caches_unavailable() {
        let manager = CacheManager::default();
        let cache = manager.get_cache("memcache", true).await.unwrap();

        manager.stop().await;

        assert!(!cache.is_running());
        assert!(matches!(
            manager.get_cache("memcache", true).await,
            Err(CacheError::InfrastructureUnavailable(_))
        ));
    }
}
