//! Local Map Module
//!
//! In-process engine combining HashMap storage with LRU tracking and
//! lifespan expiration. A single lock makes each primitive atomic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheValue, Lifespan, NamespacedKey};
use crate::engine::{DistributedMap, LruTracker, StoredEntry, WriteFlags};
use crate::error::{CacheError, Result};

// == Map State ==
#[derive(Debug, Default)]
struct MapState {
    /// Key-value storage
    entries: HashMap<NamespacedKey, StoredEntry>,
    /// LRU access tracker
    lru: LruTracker<NamespacedKey>,
    /// Performance statistics
    stats: CacheStats,
    /// Payload bytes across `entries`
    total_bytes: u64,
}

impl MapState {
    /// Returns the live entry for `key`, dropping it first if it has expired.
    fn live(&mut self, key: &NamespacedKey, now: DateTime<Utc>) -> Option<&StoredEntry> {
        let expired = self.entries.get(key)?.is_expired_at(now);
        if expired {
            self.discard(key);
            self.stats.record_expirations(1);
            return None;
        }
        self.entries.get(key)
    }

    fn live_value(&mut self, key: &NamespacedKey, now: DateTime<Utc>) -> Option<CacheValue> {
        self.live(key, now).map(|entry| entry.value.clone())
    }

    /// Stores `entry`, evicting the least recently used key when full.
    ///
    /// An entry that is already expired evicts whatever the key held and is
    /// not stored.
    fn install(
        &mut self,
        key: NamespacedKey,
        entry: StoredEntry,
        max_entries: usize,
        now: DateTime<Utc>,
    ) {
        if entry.is_expired_at(now) {
            self.discard(&key);
            self.stats.record_expirations(1);
            return;
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && max_entries > 0 && self.entries.len() >= max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                if let Some(old) = self.entries.remove(&evicted) {
                    self.total_bytes -= old.size();
                }
                self.stats.record_eviction();
                debug!(namespace = evicted.namespace(), key = evicted.key(), "evicted LRU entry");
            }
        }

        self.total_bytes += entry.size();
        if let Some(old) = self.entries.insert(key.clone(), entry) {
            self.total_bytes -= old.size();
        }
        self.lru.touch(&key);
    }

    fn discard(&mut self, key: &NamespacedKey) -> Option<StoredEntry> {
        let removed = self.entries.remove(key)?;
        self.total_bytes -= removed.size();
        self.lru.remove(key);
        Some(removed)
    }
}

// == Local Map ==
/// Thread-safe in-process [`DistributedMap`].
#[derive(Debug)]
pub struct LocalMap {
    name: String,
    /// Maximum number of entries allowed, 0 = unbounded
    max_entries: usize,
    running: AtomicBool,
    state: RwLock<MapState>,
}

impl LocalMap {
    // == Constructor ==
    /// Creates a new map. `max_entries` of 0 disables capacity eviction.
    pub fn new(name: impl Into<String>, max_entries: usize) -> Self {
        Self {
            name: name.into(),
            max_entries,
            running: AtomicBool::new(true),
            state: RwLock::new(MapState::default()),
        }
    }

    /// Stops the map; every later call fails as unavailable.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!(cache = %self.name, "cache stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(CacheError::InfrastructureUnavailable(format!(
                "cache '{}' is stopped",
                self.name
            )))
        }
    }
}

#[async_trait]
impl DistributedMap for LocalMap {
    fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    async fn get(&self, key: &NamespacedKey) -> Result<Option<CacheValue>> {
        self.ensure_running()?;
        // Write lock: reads update LRU order and counters
        let mut state = self.state.write().await;
        match state.live_value(key, Utc::now()) {
            Some(value) => {
                state.stats.record_hit(value.size_in_bytes());
                state.lru.touch(key);
                Ok(Some(value))
            }
            None => {
                state.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn contains_key(&self, key: &NamespacedKey) -> Result<bool> {
        self.ensure_running()?;
        let mut state = self.state.write().await;
        Ok(state.live(key, Utc::now()).is_some())
    }

    // == Put ==
    async fn put(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
        flags: WriteFlags,
    ) -> Result<Option<CacheValue>> {
        self.ensure_running()?;
        let now = Utc::now();
        let mut state = self.state.write().await;
        let previous = if flags.skips_previous_value() {
            None
        } else {
            state.live_value(&key, now)
        };
        state.install(key, StoredEntry::new(value, lifespan, now), self.max_entries, now);
        Ok(previous)
    }

    async fn put_all(
        &self,
        entries: Vec<(NamespacedKey, CacheValue)>,
        lifespan: Lifespan,
        flags: WriteFlags,
    ) -> Result<()> {
        for (key, value) in entries {
            self.put(key, value, lifespan, flags).await?;
        }
        Ok(())
    }

    async fn put_if_absent(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
    ) -> Result<Option<CacheValue>> {
        self.ensure_running()?;
        let now = Utc::now();
        let mut state = self.state.write().await;
        if let Some(existing) = state.live_value(&key, now) {
            return Ok(Some(existing));
        }
        state.install(key, StoredEntry::new(value, lifespan, now), self.max_entries, now);
        Ok(None)
    }

    async fn replace(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
    ) -> Result<Option<CacheValue>> {
        self.ensure_running()?;
        let now = Utc::now();
        let mut state = self.state.write().await;
        let Some(previous) = state.live_value(&key, now) else {
            return Ok(None);
        };
        state.install(key, StoredEntry::new(value, lifespan, now), self.max_entries, now);
        Ok(Some(previous))
    }

    // == Compare And Swap ==
    async fn compare_and_swap(
        &self,
        key: NamespacedKey,
        expected: Option<&CacheValue>,
        new: CacheValue,
        lifespan: Option<Lifespan>,
    ) -> Result<bool> {
        self.ensure_running()?;
        let now = Utc::now();
        let mut state = self.state.write().await;
        let (current, deadline) = match state.live(&key, now) {
            Some(entry) => (Some(&entry.value), entry.expires_at),
            None => (None, None),
        };
        if current != expected {
            return Ok(false);
        }

        let entry = match lifespan {
            Some(lifespan) => StoredEntry::new(new, lifespan, now),
            None => StoredEntry::with_deadline(new, deadline, now),
        };
        state.install(key, entry, self.max_entries, now);
        Ok(true)
    }

    // == Remove ==
    async fn remove(&self, key: &NamespacedKey) -> Result<Option<CacheValue>> {
        self.ensure_running()?;
        let now = Utc::now();
        let mut state = self.state.write().await;
        let removed = state.discard(key);
        Ok(removed
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value))
    }

    async fn clear(&self) -> Result<()> {
        self.ensure_running()?;
        let mut state = self.state.write().await;
        let count = state.entries.len();
        state.entries.clear();
        state.lru.clear();
        state.total_bytes = 0;
        info!(cache = %self.name, count, "cleared all entries");
        Ok(())
    }

    // == Purge Expired ==
    async fn purge_expired(&self) -> Result<usize> {
        self.ensure_running()?;
        let now = Utc::now();
        let mut state = self.state.write().await;
        let expired: Vec<NamespacedKey> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.discard(key);
        }
        state.stats.record_expirations(expired.len());
        Ok(expired.len())
    }

    // == Stats ==
    async fn stats(&self) -> Result<CacheStats> {
        self.ensure_running()?;
        let state = self.state.read().await;
        let mut stats = state.stats.clone();
        stats.set_size(state.entries.len(), state.total_bytes);
        Ok(stats)
    }
}
