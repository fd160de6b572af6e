//! Cache Module
//!
//! In-memory LRU cache for heterogeneous keys and values with an optional
//! count limit.

mod entry;
mod eviction;
mod index;
mod key;
mod list;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{Entry, EntryRef};
pub use eviction::CountLimit;
pub use index::KeyIndex;
pub use key::{CacheKey, FloatKey, KeyObject};
pub use list::{Iter, RecencyList};
pub use stats::CacheStats;
pub use store::{CachedValue, LruCache};
