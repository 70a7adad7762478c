//! Cache Statistics Module
//!
//! Tracks per-cache counters surfaced by the stats endpoint.

use serde::Serialize;

// == Cache Stats ==
/// Counters for one cache instance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to go upstream (absent or expired)
    pub misses: u64,
    /// Entries removed because their TTL elapsed
    pub expired: u64,
    /// Entries removed to stay under the capacity bound
    pub evictions: u64,
    /// Entries currently held
    pub entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the expired-removal counter.
    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
