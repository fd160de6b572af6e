//! Recency List Module
//!
//! Doubly linked list of cache entries ordered by recency of use.
//!
//! Entries live in a slab of slots addressed by index, so `prev`/`next` are
//! plain indices and no entry owns another. Freed slots are recycled through
//! a free list; every allocation takes a fresh generation so a handle to a
//! recycled slot is recognised as stale.

use super::entry::{Entry, EntryRef};

#[derive(Debug)]
struct Slot<K, V> {
    generation: u64,
    entry: Option<Entry<K, V>>,
}

// == Recency List ==
/// Ordered list of entries where:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Every operation is O(1) except [`remove_all`](Self::remove_all), which
/// drops each entry.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    count: usize,
    next_generation: u64,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            count: 0,
            next_generation: 0,
        }
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.count
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    // == Prepend ==
    /// Links a new entry as the head and returns its handle.
    pub fn prepend(&mut self, key: K, value: V) -> EntryRef {
        let handle = self.alloc(Entry::new(key, value));
        let idx = handle.slot;
        let old_head = self.head;

        self.entry_mut(idx).next = old_head;
        match old_head {
            Some(head_idx) => self.entry_mut(head_idx).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.count += 1;
        handle
    }

    // == Append ==
    /// Links a new entry as the tail and returns its handle.
    pub fn append(&mut self, key: K, value: V) -> EntryRef {
        let handle = self.alloc(Entry::new(key, value));
        let idx = handle.slot;
        let old_tail = self.tail;

        self.entry_mut(idx).prev = old_tail;
        match old_tail {
            Some(tail_idx) => self.entry_mut(tail_idx).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.count += 1;
        handle
    }

    // == Remove ==
    /// Unlinks the entry and hands it back.
    ///
    /// # Panics
    /// If `handle` is stale or belongs to another list.
    pub fn remove(&mut self, handle: EntryRef) -> Entry<K, V> {
        let idx = self.resolve(handle);
        self.unlink(idx);
        self.release(idx)
    }

    // == Remove Last ==
    /// Unlinks and returns the tail entry, or None if the list is empty.
    pub fn remove_last(&mut self) -> Option<Entry<K, V>> {
        let idx = self.tail?;
        self.unlink(idx);
        Some(self.release(idx))
    }

    // == Remove All ==
    /// Drops every entry and resets the list to empty.
    ///
    /// Generations keep counting up, so handles issued before the reset stay
    /// detectably stale.
    pub fn remove_all(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.count = 0;
    }

    // == Move To Head ==
    /// Re-links the entry at the head under a new identity.
    ///
    /// The passed handle is invalidated; use the returned one from here on.
    ///
    /// # Panics
    /// If `handle` is stale or belongs to another list.
    pub fn move_to_head(&mut self, handle: EntryRef) -> EntryRef {
        let (key, value) = self.remove(handle).into_parts();
        self.prepend(key, value)
    }

    // == Get ==
    /// Borrows the entry behind a live handle.
    ///
    /// # Panics
    /// If `handle` is stale or belongs to another list.
    pub fn get(&self, handle: EntryRef) -> &Entry<K, V> {
        let idx = self.resolve(handle);
        self.entry(idx)
    }

    /// Handle of the most recently used entry.
    pub fn head(&self) -> Option<EntryRef> {
        self.head.map(|idx| self.handle_at(idx))
    }

    /// Handle of the least recently used entry.
    pub fn tail(&self) -> Option<EntryRef> {
        self.tail.map(|idx| self.handle_at(idx))
    }

    // == Iter ==
    /// Iterates key/value pairs from head to tail.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.count,
        }
    }

    // == Consistency Check ==
    /// Walks the whole list and panics on any broken link or count mismatch.
    pub fn assert_consistent(&self) {
        let mut prev = None;
        let mut cursor = self.head;
        let mut seen = 0usize;

        while let Some(idx) = cursor {
            let entry = self.entry(idx);
            assert_eq!(
                entry.prev, prev,
                "recency list corrupted: slot {} points back to {:?}, expected {:?}",
                idx, entry.prev, prev
            );
            seen += 1;
            assert!(
                seen <= self.count,
                "recency list corrupted: more than {} entries reachable from head",
                self.count
            );
            prev = Some(idx);
            cursor = entry.next;
        }

        assert_eq!(
            prev, self.tail,
            "recency list corrupted: walk ended at {:?} but tail is {:?}",
            prev, self.tail
        );
        assert_eq!(
            seen, self.count,
            "recency list corrupted: {} entries reachable, count is {}",
            seen, self.count
        );
    }

    fn resolve(&self, handle: EntryRef) -> usize {
        match self.slots.get(handle.slot) {
            Some(slot) if slot.generation == handle.generation && slot.entry.is_some() => {
                handle.slot
            }
            _ => panic!("entry reference {:?} is not linked in this list", handle),
        }
    }

    fn alloc(&mut self, entry: Entry<K, V>) -> EntryRef {
        let generation = self.next_generation;
        self.next_generation += 1;

        let slot = Slot {
            generation,
            entry: Some(entry),
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };

        EntryRef {
            slot: idx,
            generation,
        }
    }

    fn release(&mut self, idx: usize) -> Entry<K, V> {
        let entry = match self.slots[idx].entry.take() {
            Some(entry) => entry,
            None => unreachable!("released vacant slot {}", idx),
        };
        self.free.push(idx);
        self.count -= 1;

        if self.head.is_none() && self.count > 0 {
            panic!(
                "recency list corrupted: head is empty with {} entries left",
                self.count
            );
        }
        entry
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let entry = self.entry(idx);
            (entry.prev, entry.next)
        };

        match prev {
            Some(prev_idx) => self.entry_mut(prev_idx).next = next,
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.entry_mut(next_idx).prev = prev,
            None => self.tail = prev,
        }

        let entry = self.entry_mut(idx);
        entry.prev = None;
        entry.next = None;
    }

    fn entry(&self, idx: usize) -> &Entry<K, V> {
        match self.slots.get(idx).and_then(|slot| slot.entry.as_ref()) {
            Some(entry) => entry,
            None => panic!("recency list corrupted: link to vacant slot {}", idx),
        }
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        match self.slots.get_mut(idx).and_then(|slot| slot.entry.as_mut()) {
            Some(entry) => entry,
            None => panic!("recency list corrupted: link to vacant slot {}", idx),
        }
    }

    fn handle_at(&self, idx: usize) -> EntryRef {
        EntryRef {
            slot: idx,
            generation: self.slots[idx].generation,
        }
    }
}

// == Iterator ==
/// Head-to-tail iterator returned by [`RecencyList::iter`].
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let list = self.list;
        let entry = list.entry(idx);
        self.cursor = entry.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
