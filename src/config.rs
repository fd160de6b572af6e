//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::CountLimit;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold (0 = no limit)
    pub count_limit: usize,
    /// Clear the cache when a memory warning is received
    pub clear_on_memory_warning: bool,
    /// Clear the cache when the process moves to the background
    pub clear_on_background: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_COUNT_LIMIT` - Maximum cache entries, 0 for none (default: 0)
    /// - `CACHE_CLEAR_ON_MEMORY_WARNING` - Clear on memory warning (default: true)
    /// - `CACHE_CLEAR_ON_BACKGROUND` - Clear when backgrounded (default: true)
    ///
    /// Unset variables fall back to their defaults; set but unparseable
    /// variables are reported as errors.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let limit: i64 = parse_var("CACHE_COUNT_LIMIT", defaults.count_limit as i64)?;

        Ok(Self {
            count_limit: CountLimit::try_from(limit)?.get(),
            clear_on_memory_warning: parse_var(
                "CACHE_CLEAR_ON_MEMORY_WARNING",
                defaults.clear_on_memory_warning,
            )?,
            clear_on_background: parse_var(
                "CACHE_CLEAR_ON_BACKGROUND",
                defaults.clear_on_background,
            )?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count_limit: 0,
            clear_on_memory_warning: true,
            clear_on_background: true,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig { name, value: raw }),
        Err(_) => Ok(default),
    }
}
