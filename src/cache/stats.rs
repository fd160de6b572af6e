//! Cache Statistics Module
//!
//! Tracks hits, misses, insertions and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Observational counters. They never affect what the cache holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Typed reads that found a value of the requested type
    pub hits: u64,
    /// Typed reads that found nothing, or a value of another type
    pub misses: u64,
    /// Calls to `set`, including overwrites
    pub inserts: u64,
    /// Entries dropped to honour the count limit
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
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

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_evictions(&mut self, evicted: usize) {
        self.evictions += evicted as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
