//! Console Module
//!
//! Line-oriented front end for the cache. Reads one command per line and
//! writes one JSON reply per line.
//!
//! # Commands
//! - `set <key> <value>` - Store a value
//! - `get <key> [int|float|text]` - Read a value, optionally typed
//! - `del <key>` - Remove a key
//! - `clear` - Remove every entry
//! - `limit [n]` - Show or change the count limit
//! - `count` - Show the entry count
//! - `keys` - List keys, most recently used first
//! - `stats` - Show cache statistics
//! - `pressure memory|background` - Send a pressure event

pub mod command;
pub mod handlers;
pub mod reply;

use std::io::BufRead;
use std::thread;

use serde_json::json;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;

pub use command::{Command, Token, ValueKind};
pub use handlers::{dispatch, execute, ConsoleState};
pub use reply::Reply;

/// Serves commands from `reader` until end of input.
///
/// Blank lines and lines starting with `#` are skipped. Bad commands get an
/// `{"error": ...}` reply and do not stop the loop.
pub async fn run<R, W>(state: &ConsoleState, reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        write_reply(state, &line, &mut writer).await?;
    }

    Ok(())
}

/// Serves commands arriving from a [`spawn_line_reader`] channel until the
/// reader reaches end of input.
pub async fn serve<W>(
    state: &ConsoleState,
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    mut writer: W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        write_reply(state, &line?, &mut writer).await?;
    }

    Ok(())
}

/// Reads lines from `reader` on a dedicated OS thread.
///
/// A blocked read holds only that thread, never the runtime, so the process
/// can shut down while the console is waiting for input. The thread stops at
/// end of input, on the first read error, or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);

    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
        debug!("Console reader stopped");
    });

    rx
}

async fn write_reply<W>(state: &ConsoleState, line: &str, writer: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }

    let result = match line.parse::<Command>() {
        Ok(command) => dispatch(state, command).await,
        Err(error) => Err(error),
    };

    let mut rendered = render(&result);
    rendered.push('\n');
    writer.write_all(rendered.as_bytes()).await?;
    writer.flush().await
}

/// Formats a command result as a single JSON line (without the newline).
pub fn render(result: &Result<Reply>) -> String {
    match result {
        Ok(reply) => serde_json::to_string(reply)
            .unwrap_or_else(|error| json!({ "error": error.to_string() }).to_string()),
        Err(error) => json!({ "error": error.to_string() }).to_string(),
    }
}
