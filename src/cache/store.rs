//! Cache Store Module
//!
//! Main cache engine combining the key index with the recency list and the
//! count-limit eviction policy.

use std::any::Any;

use tracing::{debug, trace};

use crate::cache::{CacheKey, CacheStats, CountLimit, EntryRef, KeyIndex, KeyObject, RecencyList};
use crate::config::Config;

/// Type-erased payload stored for every entry.
pub type CachedValue = Box<dyn Any + Send>;

// == LRU Cache ==
/// Least recently used cache holding values of any type under keys of any
/// hashable type.
///
/// Every read or write of a key makes it the most recently used entry. When
/// a count limit is set, the least recently used entries are dropped as soon
/// as the cache holds more than the limit.
///
/// The cache does no locking of its own. Share it across threads behind a
/// mutex (see [`SharedCache`](crate::tasks::SharedCache)).
#[derive(Debug, Default)]
pub struct LruCache {
    /// Entries, most recently used first
    items: RecencyList<CacheKey, CachedValue>,
    /// Key to entry lookup, always in step with `items`
    index: KeyIndex,
    /// Maximum number of entries, 0 = no limit
    count_limit: CountLimit,
    /// Performance statistics
    stats: CacheStats,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache with no count limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache holding at most `limit` entries (0 = no limit).
    pub fn with_count_limit(limit: usize) -> Self {
        Self {
            count_limit: CountLimit::new(limit),
            ..Self::default()
        }
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_count_limit(config.count_limit)
    }

    // == Count ==
    /// Returns the current number of entries in the cache.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // == Count Limit ==
    /// Returns the entry limit, 0 when unbounded.
    pub fn count_limit(&self) -> usize {
        self.count_limit.get()
    }

    /// Changes the entry limit and evicts immediately if the cache is now
    /// over it.
    pub fn set_count_limit(&mut self, limit: usize) {
        self.count_limit = CountLimit::new(limit);
        debug!(count_limit = limit, count = self.count(), "count limit changed");
        self.evict_items();
    }

    // == Set ==
    /// Stores `value` under `key`.
    ///
    /// An existing entry for the key is dropped first, so the new value
    /// always lands as the most recently used entry no matter where the old
    /// one sat.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: KeyObject,
        V: Any + Send,
    {
        let key = CacheKey::new(key);
        if let Some(existing) = self.index.remove(key.as_key_object()) {
            self.items.remove(existing);
        }

        let handle = self.items.prepend(key.clone(), Box::new(value));
        trace!(key = ?key, count = self.items.len(), "set");
        self.index.set(key, handle);
        self.stats.record_insert();

        self.evict_items();
    }

    // == Get ==
    /// Returns the value for `key` if it is stored as a `T`.
    ///
    /// A hit promotes the entry to most recently used. A value of any other
    /// type is reported as a miss and leaves the entry exactly where it was.
    pub fn get<T, K>(&mut self, key: &K) -> Option<&T>
    where
        T: Any,
        K: KeyObject,
    {
        let handle = self.promote(key, |value| value.is::<T>())?;
        self.items.get(handle).value.downcast_ref::<T>()
    }

    /// Like [`get`](Self::get), returning a clone of the value.
    pub fn get_cloned<T, K>(&mut self, key: &K) -> Option<T>
    where
        T: Any + Clone,
        K: KeyObject,
    {
        self.get::<T, K>(key).cloned()
    }

    /// Returns the stored value whatever its type, promoting it on a hit.
    pub fn get_any<K: KeyObject>(&mut self, key: &K) -> Option<&(dyn Any + Send)> {
        let handle = self.promote(key, |_| true)?;
        Some(&*self.items.get(handle).value)
    }

    // == Contains ==
    /// Checks for a key without touching its recency.
    pub fn contains_key<K: KeyObject>(&self, key: &K) -> bool {
        self.index.get(key).is_some()
    }

    // == Assign ==
    /// Stores `Some(value)` under `key`, or removes the key on `None`.
    pub fn assign<K, V>(&mut self, key: K, value: Option<V>)
    where
        K: KeyObject,
        V: Any + Send,
    {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove_item(&key);
            }
        }
    }

    // == Remove ==
    /// Removes the entry for `key`. Absent keys are ignored.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_item<K: KeyObject>(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(handle) => {
                self.items.remove(handle);
                trace!(key = ?key, count = self.items.len(), "removed");
                true
            }
            None => false,
        }
    }

    // == Remove All ==
    /// Drops every entry.
    pub fn remove_all_items(&mut self) {
        let dropped = self.items.len();
        self.items.remove_all();
        self.index.remove_all();
        if dropped > 0 {
            debug!(dropped, "cache cleared");
        }
    }

    // == Evict ==
    /// Drops least recently used entries until the count limit holds.
    ///
    /// Runs after every `set` and every limit change. Returns the number of
    /// entries evicted.
    pub fn evict_items(&mut self) -> usize {
        let excess = self.count_limit.overflow(self.items.len());
        let mut evicted = 0;

        while evicted < excess {
            let Some(entry) = self.items.remove_last() else {
                break;
            };
            self.index.remove(entry.key.as_key_object());
            debug!(
                key = ?entry.key,
                count_limit = self.count_limit.get(),
                "evicted least recently used entry"
            );
            evicted += 1;
        }

        self.stats.record_evictions(evicted);
        evicted
    }

    // == Keys ==
    /// Iterates keys from most to least recently used. Does not promote.
    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> + '_ {
        self.items.iter().map(|(key, _)| key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.count());
        stats
    }

    /// Moves the entry for `key` to the head when `accepts` approves its
    /// value, and returns its new handle.
    fn promote(
        &mut self,
        key: &dyn KeyObject,
        accepts: impl FnOnce(&(dyn Any + Send)) -> bool,
    ) -> Option<EntryRef> {
        let Some(handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };
        if !accepts(&*self.items.get(handle).value) {
            self.stats.record_miss();
            return None;
        }

        let fresh = self.items.move_to_head(handle);
        self.index.repoint(key, fresh);
        self.stats.record_hit();
        trace!(key = ?key, "promoted");
        Some(fresh)
    }

    /// Panics unless the list is well formed and the index maps exactly the
    /// listed keys.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.items.assert_consistent();
        assert_eq!(self.index.len(), self.items.len(), "index and list disagree");
        for key in self.keys() {
            assert!(
                self.index.get(key.as_key_object()).is_some(),
                "listed key {:?} missing from index",
                key
            );
        }
    }
}
