//! Key Index Module
//!
//! Maps canonical keys to their entries in the recency list.

use std::collections::HashMap;

use super::entry::EntryRef;
use super::key::{canonical, CacheKey, KeyObject};

// == Key Index ==
/// O(1) lookup from key to list entry. Holds no ordering of its own.
#[derive(Debug, Default)]
pub struct KeyIndex {
    entries: HashMap<CacheKey, EntryRef>,
}

impl KeyIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Get ==
    /// Looks up the entry handle for a key.
    pub fn get(&self, key: &dyn KeyObject) -> Option<EntryRef> {
        self.entries.get(canonical(key)).copied()
    }

    // == Set ==
    /// Records the handle for a key, returning the one it replaced.
    pub fn set(&mut self, key: CacheKey, entry: EntryRef) -> Option<EntryRef> {
        self.entries.insert(key, entry)
    }

    // == Repoint ==
    /// Points an already indexed key at a new handle.
    ///
    /// Returns false if the key is not indexed.
    pub fn repoint(&mut self, key: &dyn KeyObject, entry: EntryRef) -> bool {
        match self.entries.get_mut(canonical(key)) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Forgets a key, returning its handle if it was indexed.
    pub fn remove(&mut self, key: &dyn KeyObject) -> Option<EntryRef> {
        self.entries.remove(canonical(key))
    }

    // == Remove All ==
    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
