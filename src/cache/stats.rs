//! Cache Statistics Module
//!
//! Hit, miss and size counters sourced from the backing engine.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of engine counters.
///
/// Counters are read without pausing writers, so a snapshot taken during
/// concurrent traffic is not linearizable with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Payload bytes returned by hits
    pub bytes_returned_for_hits: u64,
    /// Entries removed to respect the capacity limit
    pub evictions: u64,
    /// Entries removed because their lifespan elapsed
    pub expirations: u64,
    /// Live entries currently stored
    pub item_count: usize,
    /// Payload bytes of all stored entries
    pub total_item_bytes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self, bytes: usize) {
        self.hits += 1;
        self.bytes_returned_for_hits += bytes as u64;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Update Size ==
    /// Updates the item count and byte total.
    pub fn set_size(&mut self, item_count: usize, total_item_bytes: u64) {
        self.item_count = item_count;
        self.total_item_bytes = total_item_bytes;
    }
}
