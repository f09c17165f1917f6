//! Cache Service Module
//!
//! The memcache-style operations: reads, conditional writes, CAS, batches
//! and counters, all namespaced and delegated to the atomic primitives of
//! the backing [`DistributedMap`]. The service holds no lock of its own.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{
    CacheStats, CacheValue, CasValues, Expiration, IdentifiableValue, KeyCodec, Lifespan,
    NamespacedKey, RequestContext, SetPolicy, MAX_VALUE_SIZE,
};
use crate::config::Config;
use crate::engine::{CacheManager, DistributedMap, WriteFlags};
use crate::error::{CacheError, Result};

/// Default bound on conditional-replace attempts per increment.
pub const DEFAULT_INCREMENT_RETRIES: usize = 128;

// == Cache Service ==
/// Namespace-aware cache operations over a shared backing map.
///
/// Every namespace shares the one backing map; [`CacheService::clear_all`]
/// therefore wipes the entries of every tenant, not just this one.
#[derive(Clone)]
pub struct CacheService {
    map: Arc<dyn DistributedMap>,
    codec: KeyCodec,
    increment_max_retries: usize,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("cache", &self.map.name())
            .field("namespace", &self.codec.namespace())
            .field("increment_max_retries", &self.increment_max_retries)
            .finish()
    }
}

impl CacheService {
    // == Constructors ==
    /// Creates a service over `map`, optionally pinned to `namespace`.
    pub fn new(map: Arc<dyn DistributedMap>, namespace: Option<String>) -> Result<Self> {
        Ok(Self {
            map,
            codec: KeyCodec::new(namespace)?,
            increment_max_retries: DEFAULT_INCREMENT_RETRIES,
        })
    }

    /// Obtains (or creates) the configured backing cache from `manager`.
    pub async fn from_manager(manager: &CacheManager, config: &Config) -> Result<Self> {
        let map = manager.get_cache(&config.cache_name, true).await?;
        let service = Self::new(map, config.namespace.clone())?
            .with_increment_retries(config.increment_max_retries);
        info!(
            cache = %config.cache_name,
            namespace = ?config.namespace,
            "cache service ready"
        );
        Ok(service)
    }

    pub fn with_increment_retries(mut self, retries: usize) -> Self {
        self.increment_max_retries = retries.max(1);
        self
    }

    /// Name of the backing cache.
    pub fn cache_name(&self) -> &str {
        self.map.name()
    }

    /// Namespace pinned on this service, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.codec.namespace()
    }

    pub fn set_namespace(&mut self, namespace: Option<String>) -> Result<()> {
        self.codec = KeyCodec::new(namespace)?;
        Ok(())
    }

    // == Reads ==
    /// Returns the live value for `key`, None if never set or expired.
    pub async fn get(&self, ctx: &RequestContext, key: &str) -> Result<Option<CacheValue>> {
        let key = self.codec.wrap(key, ctx);
        self.map.get(&key).await
    }

    /// Captures the current value (absence included) for a later CAS.
    pub async fn get_identifiable(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Result<IdentifiableValue> {
        let key = self.codec.wrap(key, ctx);
        Ok(IdentifiableValue::new(self.map.get(&key).await?))
    }

    /// One snapshot per requested key; absent keys get an absent snapshot.
    pub async fn get_identifiables<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        keys: &[S],
    ) -> Result<HashMap<String, IdentifiableValue>> {
        let wrapped = self.wrap_all(ctx, keys);
        let mut snapshots = HashMap::with_capacity(wrapped.len());
        for key in wrapped {
            let value = self.map.get(&key).await?;
            snapshots.insert(key.key().to_string(), IdentifiableValue::new(value));
        }
        Ok(snapshots)
    }

    pub async fn contains(&self, ctx: &RequestContext, key: &str) -> Result<bool> {
        let key = self.codec.wrap(key, ctx);
        self.map.contains_key(&key).await
    }

    /// Values for the keys that have one; missing keys are left out.
    pub async fn get_all<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        keys: &[S],
    ) -> Result<HashMap<String, CacheValue>> {
        let wrapped = self.wrap_all(ctx, keys);
        let mut found = HashMap::new();
        for key in wrapped {
            if let Some(value) = self.map.get(&key).await? {
                found.insert(key.key().to_string(), value);
            }
        }
        Ok(found)
    }

    // == Writes ==
    /// Unconditional write with no expiration.
    pub async fn set(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: impl Into<CacheValue>,
    ) -> Result<()> {
        self.put(ctx, key, value, None, SetPolicy::SetAlways)
            .await
            .map(|_| ())
    }

    /// Writes `value` under `policy`; returns whether it was stored.
    ///
    /// `AddOnlyIfNotPresent` and `ReplaceOnlyIfPresent` are single atomic
    /// engine calls, and a blocked write is reported as `false`.
    pub async fn put(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: impl Into<CacheValue>,
        expiration: Option<Expiration>,
        policy: SetPolicy,
    ) -> Result<bool> {
        let value = value.into();
        validate_value(&value)?;
        let key = self.codec.wrap(key, ctx);
        let lifespan = Expiration::from(expiration).to_lifespan();
        self.put_wrapped(key, value, lifespan, policy).await
    }

    async fn put_wrapped(
        &self,
        key: NamespacedKey,
        value: CacheValue,
        lifespan: Lifespan,
        policy: SetPolicy,
    ) -> Result<bool> {
        match policy {
            SetPolicy::SetAlways => {
                self.map.put(key, value, lifespan, WriteFlags::BLIND).await?;
                Ok(true)
            }
            SetPolicy::AddOnlyIfNotPresent => {
                let blocking = self.map.put_if_absent(key, value, lifespan).await?;
                Ok(blocking.is_none())
            }
            SetPolicy::ReplaceOnlyIfPresent => {
                let replaced = self.map.replace(key, value, lifespan).await?;
                Ok(replaced.is_some())
            }
        }
    }

    /// Applies `put` to every entry; returns the keys actually written.
    ///
    /// Each key is written atomically on its own; the batch as a whole is
    /// not, and a failure part-way leaves earlier keys written.
    pub async fn put_all(
        &self,
        ctx: &RequestContext,
        entries: HashMap<String, CacheValue>,
        expiration: Option<Expiration>,
        policy: SetPolicy,
    ) -> Result<HashSet<String>> {
        let mut wrapped = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            validate_value(&value)?;
            wrapped.push((self.codec.wrap(&key, ctx), value));
        }
        let lifespan = Expiration::from(expiration).to_lifespan();

        if policy == SetPolicy::SetAlways {
            let keys = wrapped.iter().map(|(k, _)| k.key().to_string()).collect();
            self.map.put_all(wrapped, lifespan, WriteFlags::BLIND).await?;
            return Ok(keys);
        }

        let mut written = HashSet::new();
        for (key, value) in wrapped {
            let raw = key.key().to_string();
            if self.put_wrapped(key, value, lifespan, policy).await? {
                written.insert(raw);
            }
        }
        debug!(policy = %policy, written = written.len(), "batch put");
        Ok(written)
    }

    // == Compare And Swap ==
    /// Installs `new` iff the key still holds the value captured in `old`.
    ///
    /// A stale snapshot is a normal `false`, not an error. A snapshot of an
    /// absent key only succeeds while the key is still absent.
    pub async fn put_if_untouched(
        &self,
        ctx: &RequestContext,
        key: &str,
        old: &IdentifiableValue,
        new: impl Into<CacheValue>,
        expiration: Option<Expiration>,
    ) -> Result<bool> {
        let new = new.into();
        validate_value(&new)?;
        let key = self.codec.wrap(key, ctx);
        let lifespan = Expiration::from(expiration).to_lifespan();
        self.map
            .compare_and_swap(key, old.value(), new, Some(lifespan))
            .await
    }

    /// Independent CAS per key; returns the keys whose swap succeeded.
    ///
    /// A per-entry expiration overrides `expiration`.
    pub async fn put_if_untouched_all(
        &self,
        ctx: &RequestContext,
        values: HashMap<String, CasValues>,
        expiration: Option<Expiration>,
    ) -> Result<HashSet<String>> {
        let mut wrapped = Vec::with_capacity(values.len());
        for (key, cas) in values {
            validate_value(&cas.new)?;
            wrapped.push((self.codec.wrap(&key, ctx), cas));
        }
        let default_lifespan = Expiration::from(expiration).to_lifespan();

        let mut swapped = HashSet::new();
        for (key, cas) in wrapped {
            let lifespan = cas
                .expiration
                .map(|e| e.to_lifespan())
                .unwrap_or(default_lifespan);
            let raw = key.key().to_string();
            if self
                .map
                .compare_and_swap(key, cas.old.value(), cas.new, Some(lifespan))
                .await?
            {
                swapped.insert(raw);
            }
        }
        Ok(swapped)
    }

    // == Deletes ==
    /// Returns true iff a live entry existed and was removed.
    pub async fn delete(&self, ctx: &RequestContext, key: &str) -> Result<bool> {
        let key = self.codec.wrap(key, ctx);
        Ok(self.map.remove(&key).await?.is_some())
    }

    /// Returns the keys that existed and were removed.
    pub async fn delete_all<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        keys: &[S],
    ) -> Result<HashSet<String>> {
        let wrapped = self.wrap_all(ctx, keys);
        let mut removed = HashSet::new();
        for key in wrapped {
            if self.map.remove(&key).await?.is_some() {
                removed.insert(key.key().to_string());
            }
        }
        Ok(removed)
    }

    // == Increment ==
    /// Adds `delta` to the integer stored at `key` and returns the result.
    ///
    /// An absent key yields None, or installs `initial_value` unchanged when
    /// one is given. Addition wraps on overflow. Each attempt is a read
    /// followed by a conditional replace; a lost race retries, up to the
    /// configured bound.
    pub async fn increment(
        &self,
        ctx: &RequestContext,
        key: &str,
        delta: i64,
        initial_value: Option<i64>,
    ) -> Result<Option<i64>> {
        let key = self.codec.wrap(key, ctx);
        self.increment_wrapped(key, delta, initial_value).await
    }

    async fn increment_wrapped(
        &self,
        key: NamespacedKey,
        delta: i64,
        initial_value: Option<i64>,
    ) -> Result<Option<i64>> {
        for attempt in 1..=self.increment_max_retries {
            match self.map.get(&key).await? {
                None => {
                    let Some(initial) = initial_value else {
                        return Ok(None);
                    };
                    let installed = self
                        .map
                        .put_if_absent(key.clone(), initial.into(), Lifespan::Unbounded)
                        .await?
                        .is_none();
                    if installed {
                        return Ok(Some(initial));
                    }
                }
                Some(current) => {
                    let old = current.as_integer().ok_or_else(|| {
                        CacheError::InvalidValue(format!(
                            "Cannot increment {} value at '{}'",
                            current.type_name(),
                            key.key()
                        ))
                    })?;
                    let new = old.wrapping_add(delta);
                    // None lifespan keeps the counter's existing deadline
                    if self
                        .map
                        .compare_and_swap(key.clone(), Some(&current), new.into(), None)
                        .await?
                    {
                        return Ok(Some(new));
                    }
                }
            }
            debug!(key = key.key(), attempt, "increment lost a race, retrying");
        }

        warn!(
            namespace = key.namespace(),
            key = key.key(),
            retries = self.increment_max_retries,
            "increment gave up under contention"
        );
        Err(CacheError::Contention(format!(
            "increment of '{}' did not converge after {} attempts",
            key.key(),
            self.increment_max_retries
        )))
    }

    /// Increments every key by `delta`; no cross-key atomicity.
    pub async fn increment_all<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        keys: &[S],
        delta: i64,
        initial_value: Option<i64>,
    ) -> Result<HashMap<String, Option<i64>>> {
        let wrapped = self.wrap_all(ctx, keys);
        let mut results = HashMap::with_capacity(wrapped.len());
        for key in wrapped {
            let raw = key.key().to_string();
            results.insert(raw, self.increment_wrapped(key, delta, initial_value).await?);
        }
        Ok(results)
    }

    /// Increments each key by its own offset; no cross-key atomicity.
    pub async fn increment_all_offsets(
        &self,
        ctx: &RequestContext,
        offsets: HashMap<String, i64>,
        initial_value: Option<i64>,
    ) -> Result<HashMap<String, Option<i64>>> {
        let mut wrapped = Vec::with_capacity(offsets.len());
        for (key, delta) in offsets {
            wrapped.push((self.codec.wrap(&key, ctx), delta));
        }
        let mut results = HashMap::with_capacity(wrapped.len());
        for (key, delta) in wrapped {
            let raw = key.key().to_string();
            results.insert(raw, self.increment_wrapped(key, delta, initial_value).await?);
        }
        Ok(results)
    }

    // == Backing Store ==
    /// Removes every entry of the backing cache, in every namespace.
    pub async fn clear_all(&self) -> Result<()> {
        warn!(cache = self.map.name(), "clearing all namespaces");
        self.map.clear().await
    }

    /// Snapshot of the backing cache's counters.
    pub async fn statistics(&self) -> Result<CacheStats> {
        self.map.stats().await
    }

    /// Drops expired entries from the backing cache.
    pub async fn purge_expired(&self) -> Result<usize> {
        self.map.purge_expired().await
    }

    fn wrap_all<S: AsRef<str>>(&self, ctx: &RequestContext, keys: &[S]) -> Vec<NamespacedKey> {
        keys.iter()
            .map(|key| self.codec.wrap(key.as_ref(), ctx))
            .collect()
    }
}

// == Validation ==
fn validate_value(value: &CacheValue) -> Result<()> {
    if value.size_in_bytes() > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidArgument(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }
    Ok(())
}
