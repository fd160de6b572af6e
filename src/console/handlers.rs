//! Console handlers
//!
//! Executes parsed commands against the shared cache.

use std::any::Any;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::debug;

use super::command::{Command, Token, ValueKind};
use super::reply::Reply;
use crate::cache::{CountLimit, FloatKey, KeyObject, LruCache};
use crate::error::{CacheError, Result};
use crate::tasks::{PressureEvent, SharedCache};

/// State shared by every console command.
#[derive(Clone)]
pub struct ConsoleState {
    /// Cache behind its caller-side lock
    pub cache: SharedCache,
    /// Feed into the pressure listener
    pub events: mpsc::Sender<PressureEvent>,
}

impl ConsoleState {
    pub fn new(cache: SharedCache, events: mpsc::Sender<PressureEvent>) -> Self {
        Self { cache, events }
    }
}

/// Runs `$body` with `$key` bound to the token's natural key type:
/// `i64`, [`FloatKey`] or `String`.
macro_rules! with_key {
    ($token:expr, $key:ident => $body:expr) => {
        match $token {
            Token::Int(value) => {
                let $key = value;
                $body
            }
            Token::Float(value) => {
                let $key = FloatKey::new(value);
                $body
            }
            Token::Text(value) => {
                let $key = value;
                $body
            }
        }
    };
}

/// Executes a command, forwarding pressure events to the listener.
pub async fn dispatch(state: &ConsoleState, command: Command) -> Result<Reply> {
    debug!(?command, "Console command");

    match command {
        Command::Pressure(event) => {
            state
                .events
                .send(event)
                .await
                .map_err(|_| CacheError::ListenerStopped)?;
            Ok(Reply::Queued { event })
        }
        command => {
            let mut cache = state.cache.lock().await;
            execute(&mut cache, command)
        }
    }
}

/// Executes a command directly against a cache.
///
/// `pressure` needs a listener and is rejected here.
pub fn execute(cache: &mut LruCache, command: Command) -> Result<Reply> {
    match command {
        Command::Set { key, value } => {
            let label = key.to_string();
            with_key!(key, key => store(cache, key, value));
            Ok(Reply::Stored { key: label })
        }
        Command::Get { key, kind } => {
            let label = key.to_string();
            let value = with_key!(key, key => read(cache, &key, kind));
            Ok(match value {
                Some(value) => Reply::Hit { key: label, value },
                None => Reply::Miss { key: label },
            })
        }
        Command::Del { key } => {
            let label = key.to_string();
            let removed = with_key!(key, key => cache.remove_item(&key));
            Ok(Reply::Removed {
                key: label,
                removed,
            })
        }
        Command::Clear => {
            let dropped = cache.count();
            cache.remove_all_items();
            Ok(Reply::Cleared { dropped })
        }
        Command::Limit(Some(limit)) => {
            let limit = CountLimit::try_from(limit)?;
            cache.set_count_limit(limit.get());
            Ok(count_reply(cache))
        }
        Command::Limit(None) | Command::Count => Ok(count_reply(cache)),
        Command::Keys => Ok(Reply::Keys {
            keys: cache.keys().map(|key| format!("{:?}", key)).collect(),
        }),
        Command::Stats => Ok(Reply::stats(&cache.stats())),
        Command::Pressure(event) => Err(CacheError::InvalidCommand(format!(
            "'pressure {}' needs a running pressure listener",
            event
        ))),
    }
}

fn count_reply(cache: &LruCache) -> Reply {
    Reply::Count {
        count: cache.count(),
        count_limit: cache.count_limit(),
    }
}

fn store<K: KeyObject>(cache: &mut LruCache, key: K, value: Token) {
    match value {
        Token::Int(value) => cache.set(key, value),
        Token::Float(value) => cache.set(key, value),
        Token::Text(value) => cache.set(key, value),
    }
}

fn read<K: KeyObject>(cache: &mut LruCache, key: &K, kind: Option<ValueKind>) -> Option<Value> {
    match kind {
        Some(ValueKind::Int) => cache.get::<i64, _>(key).map(|value| json!(value)),
        Some(ValueKind::Float) => cache.get::<f64, _>(key).map(|value| json!(value)),
        Some(ValueKind::Text) => cache.get::<String, _>(key).map(|value| json!(value)),
        None => cache.get_any(key).map(describe),
    }
}

/// Renders a stored value of one of the console's value types.
fn describe(value: &(dyn Any + Send)) -> Value {
    if let Some(value) = value.downcast_ref::<i64>() {
        json!(value)
    } else if let Some(value) = value.downcast_ref::<f64>() {
        json!(value)
    } else if let Some(value) = value.downcast_ref::<String>() {
        json!(value)
    } else {
        json!("<opaque>")
    }
}
