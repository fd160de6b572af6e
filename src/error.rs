//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Cache misses are not
//! errors and never show up here.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its front ends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A signed count limit was below zero
    #[error("Count limit must not be negative: {0}")]
    NegativeCountLimit(i64),

    /// An environment variable held an unparseable value
    #[error("Invalid value for {name}: {value:?}")]
    InvalidConfig {
        /// Variable name
        name: &'static str,
        /// Raw value as read
        value: String,
    },

    /// A console line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The pressure listener is no longer accepting events
    #[error("Pressure listener has stopped")]
    ListenerStopped,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
