//! Creek - interactive console for the Creek LRU cache
//!
//! Reads commands from stdin and writes JSON replies to stdout. Logs go to
//! stderr.

use std::io::BufReader;

use anyhow::Context;
use tokio::io;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creek_cache::console::{self, ConsoleState};
use creek_cache::tasks::{shared, spawn_pressure_listener, PressurePolicy};
use creek_cache::{Config, LruCache};

/// Main entry point for the Creek console.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache with the configured limit
/// 4. Start the pressure listener and, on unix, the signal forwarder
/// 5. Serve console commands until end of input or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creek_cache=info,creek=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Creek cache console");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        count_limit = config.count_limit,
        clear_on_memory_warning = config.clear_on_memory_warning,
        clear_on_background = config.clear_on_background,
        "Configuration loaded"
    );

    let cache = shared(LruCache::from_config(&config));
    let (events, receiver) = mpsc::channel(16);
    let listener = spawn_pressure_listener(
        cache.clone(),
        receiver,
        PressurePolicy::from_config(&config),
    );

    #[cfg(unix)]
    let forwarder = creek_cache::tasks::spawn_signal_forwarder(events.clone())
        .context("failed to install signal handlers")?;

    let state = ConsoleState::new(cache, events);
    // Stdin is read on its own thread so Ctrl+C never waits on a pending read
    let lines = console::spawn_line_reader(BufReader::new(std::io::stdin()));

    tokio::select! {
        result = console::serve(&state, lines, io::stdout()) => {
            result.context("console I/O failed")?;
            info!("End of input");
        }
        _ = shutdown_signal() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    // Drop every sender so the listener drains and exits
    #[cfg(unix)]
    {
        forwarder.abort();
        let _ = forwarder.await;
    }
    drop(state);
    listener.await.context("pressure listener failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C. If the handler cannot be installed, waits forever.
async fn shutdown_signal() {
    if let Err(error) = signal::ctrl_c().await {
        warn!(%error, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
