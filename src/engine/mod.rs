//! Engine Module
//!
//! The backing map the cache service is layered on. The service only relies
//! on the per-key atomic primitives of [`DistributedMap`]; [`LocalMap`] is
//! the in-process implementation and [`CacheManager`] hands out named
//! instances.

mod entry;
mod local;
mod lru;
mod manager;

use async_trait::async_trait;

use crate::cache::{CacheStats, CacheValue, Lifespan, NamespacedKey};
use crate::error::Result;

pub use entry::StoredEntry;
pub use local::LocalMap;
pub use lru::LruTracker;
pub use manager::CacheManager;

// == Write Flags ==
/// Hints that let a blind write skip work the engine would otherwise do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteFlags {
    /// Do not load the previous value from a backing store
    pub skip_cache_load: bool,
    /// Do not fetch the previous value from the owning node
    pub skip_remote_lookup: bool,
}

impl WriteFlags {
    /// Flags for an unconditional write whose previous value is irrelevant.
    pub const BLIND: WriteFlags = WriteFlags {
        skip_cache_load: true,
        skip_remote_lookup: true,
    };

    pub fn skips_previous_value(&self) -> bool {
        self.skip_cache_load || self.skip_remote_lookup
    }
}

// == Distributed Map ==
/// Shared key/value map with atomic per-key primitives and lifespans.
///
/// Every method is a single atomic step against one key (except `put_all`
/// and `clear`, which give no cross-key atomicity). Expired entries are
/// never returned.
#[async_trait]
pub trait DistributedMap: Send + Sync {
    /// Logical name of this map instance.
    fn name(&self) -> &str;

    async fn get(&self, key: &NamespacedKey) -> Result<Option<CacheValue>>;

    async fn contains_key(&self, key: &NamespacedKey) -> Result<bool>;

    /// Unconditional write; returns the previous value unless `flags` say
    /// to skip looking it up.
    async fn put(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
        flags: WriteFlags,
    ) -> Result<Option<CacheValue>>;

    async fn put_all(
        &self,
        entries: Vec<(NamespacedKey, CacheValue)>,
        lifespan: Lifespan,
        flags: WriteFlags,
    ) -> Result<()>;

    /// Installs `value` only if the key is absent; returns the blocking value.
    async fn put_if_absent(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
    ) -> Result<Option<CacheValue>>;

    /// Overwrites only if the key is present; returns the replaced value.
    async fn replace(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
    ) -> Result<Option<CacheValue>>;

    /// Installs `new` iff the current value equals `expected` (None meaning
    /// absent). A None `lifespan` keeps the current entry's deadline.
    async fn compare_and_swap(
        &self,
        key: NamespacedKey,
        expected: Option<&CacheValue>,
        new: CacheValue,
        lifespan: Option<Lifespan>,
    ) -> Result<bool>;

    async fn remove(&self, key: &NamespacedKey) -> Result<Option<CacheValue>>;

    /// Removes every entry, across all namespaces.
    async fn clear(&self) -> Result<()>;

    /// Drops expired entries, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize>;

    async fn stats(&self) -> Result<CacheStats>;
}
