//! Keyed Cache Module
//!
//! Caches many results addressed by a derived key, for parameterized
//! endpoints (player profiles, experience history). Capacity is bounded:
//! once full, the least recently used entry is evicted.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, KEY_DELIMITER};

// == Key Derivation ==
/// Builds a cache key from request parameters.
///
/// Parts are trimmed and lowercased so case-variant usernames land on the
/// same entry, then joined with [`KEY_DELIMITER`]. Every parameter that
/// changes the response must be passed in, so distinct requests never share
/// a key.
pub fn derive_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(&KEY_DELIMITER.to_string())
}

// == Keyed Cache ==
/// Bounded keyed cache with lazy per-key expiry and LRU eviction.
#[derive(Debug)]
pub struct KeyedCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    /// Access order: front = most recently used, back = eviction candidate
    recency: VecDeque<String>,
    capacity: usize,
    ttl: Duration,
    stats: CacheStats,
}

impl<T: Clone> KeyedCache<T> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries, each valid
    /// for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            capacity: capacity.max(1),
            ttl,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and unexpired.
    ///
    /// An expired entry for the key is removed before reporting a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.recency.retain(|k| k != key);
                self.stats.record_expired();
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or overwrites the entry for `key`.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry first.
    pub fn set(&mut self, key: String, value: T) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.recency.pop_back() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.touch(&key);
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of this cache's counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.entries = self.entries.len();
        stats
    }

    /// Moves `key` to the most-recently-used position.
    fn touch(&mut self, key: &str) {
        self.recency.retain(|k| k != key);
        self.recency.push_front(key.to_string());
    }
}
