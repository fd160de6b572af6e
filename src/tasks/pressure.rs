//! Pressure Listener Task
//!
//! Background task that empties the cache when the process reports memory
//! pressure or moves to the background.
//!
//! The cache never subscribes to platform notifications itself. Whoever owns
//! the event source sends [`PressureEvent`]s down a channel and this task
//! turns them into `remove_all_items` calls.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LruCache;
use crate::config::Config;
use crate::error::CacheError;

/// Cache shared between tasks. The mutex is the only synchronization; the
/// cache itself does no locking.
pub type SharedCache = Arc<Mutex<LruCache>>;

/// Wraps a cache for sharing between tasks.
pub fn shared(cache: LruCache) -> SharedCache {
    Arc::new(Mutex::new(cache))
}

// == Pressure Event ==
/// Process-wide event that may warrant dropping every cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureEvent {
    /// The system is running low on memory
    MemoryWarning,
    /// The process was moved to the background
    EnteredBackground,
}

impl fmt::Display for PressureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressureEvent::MemoryWarning => f.write_str("memory-warning"),
            PressureEvent::EnteredBackground => f.write_str("background"),
        }
    }
}

impl FromStr for PressureEvent {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" | "memory-warning" => Ok(PressureEvent::MemoryWarning),
            "background" => Ok(PressureEvent::EnteredBackground),
            other => Err(CacheError::InvalidCommand(format!(
                "unknown pressure event '{}'",
                other
            ))),
        }
    }
}

// == Pressure Policy ==
/// Which events clear the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressurePolicy {
    pub clear_on_memory_warning: bool,
    pub clear_on_background: bool,
}

impl PressurePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            clear_on_memory_warning: config.clear_on_memory_warning,
            clear_on_background: config.clear_on_background,
        }
    }

    pub fn clears_on(&self, event: PressureEvent) -> bool {
        match event {
            PressureEvent::MemoryWarning => self.clear_on_memory_warning,
            PressureEvent::EnteredBackground => self.clear_on_background,
        }
    }
}

impl Default for PressurePolicy {
    fn default() -> Self {
        Self {
            clear_on_memory_warning: true,
            clear_on_background: true,
        }
    }
}

/// Spawns a task that clears `cache` for every event the policy accepts.
///
/// The task ends once every sender for `events` has been dropped.
///
/// # Example
/// ```ignore
/// let cache = shared(LruCache::new());
/// let (tx, rx) = tokio::sync::mpsc::channel(8);
/// let handle = spawn_pressure_listener(cache.clone(), rx, PressurePolicy::default());
/// tx.send(PressureEvent::MemoryWarning).await?;
/// ```
pub fn spawn_pressure_listener(
    cache: SharedCache,
    mut events: mpsc::Receiver<PressureEvent>,
    policy: PressurePolicy,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?policy, "Starting pressure listener");

        while let Some(event) = events.recv().await {
            if !policy.clears_on(event) {
                debug!(%event, "Pressure event ignored by policy");
                continue;
            }

            let dropped = {
                let mut cache_guard = cache.lock().await;
                let dropped = cache_guard.count();
                cache_guard.remove_all_items();
                dropped
            };
            info!(%event, dropped, "Cache cleared on pressure event");
        }

        info!("Pressure listener stopped");
    })
}
