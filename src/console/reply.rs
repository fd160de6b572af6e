//! Console replies
//!
//! Every command answers with exactly one JSON object, tagged by `status`.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::tasks::PressureEvent;

/// Reply to a console command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// A value was stored
    Stored { key: String },
    /// A read found a value
    Hit { key: String, value: Value },
    /// A read found nothing of the requested type
    Miss { key: String },
    /// Result of a delete; `removed` is false for absent keys
    Removed { key: String, removed: bool },
    /// Every entry was dropped
    Cleared { dropped: usize },
    Count { count: usize, count_limit: usize },
    /// Keys from most to least recently used
    Keys { keys: Vec<String> },
    Stats {
        hits: u64,
        misses: u64,
        inserts: u64,
        evictions: u64,
        total_entries: usize,
        hit_rate: f64,
    },
    /// A pressure event was handed to the listener
    Queued { event: PressureEvent },
}

impl Reply {
    /// Builds a stats reply, including the derived hit rate.
    pub fn stats(stats: &CacheStats) -> Self {
        Reply::Stats {
            hits: stats.hits,
            misses: stats.misses,
            inserts: stats.inserts,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}
