//! Creek Cache - An in-process LRU cache
//!
//! Stores values of any type under keys of any hashable type, with an
//! optional limit on the number of entries.

pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod tasks;

pub use cache::{CacheKey, FloatKey, LruCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_pressure_listener, PressureEvent, PressurePolicy, SharedCache};
