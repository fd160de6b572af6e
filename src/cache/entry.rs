//! Cache Entry Module
//!
//! Defines the node stored in the recency list and the handle used to
//! address it.

// == Entry Handle ==
/// Stable handle to an entry inside a [`RecencyList`](super::RecencyList).
///
/// A handle is valid until its entry leaves the list, either by removal or
/// by promotion. The generation makes stale handles detectable even when the
/// slot they point at has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryRef {
    pub(super) slot: usize,
    pub(super) generation: u64,
}

// == Entry ==
/// One cached key/value pair plus its position in the recency list.
#[derive(Debug)]
pub struct Entry<K, V> {
    /// Identity of the entry, fixed at creation
    pub key: K,
    /// The stored payload
    pub value: V,
    /// Neighbour toward the head (more recently used)
    pub(super) prev: Option<usize>,
    /// Neighbour toward the tail (less recently used)
    pub(super) next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub(super) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}
