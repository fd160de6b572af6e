//! Signal Forwarder Task
//!
//! Maps unix signals onto pressure events:
//! - `SIGUSR1` => [`PressureEvent::MemoryWarning`]
//! - `SIGUSR2` => [`PressureEvent::EnteredBackground`]

use std::io;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::PressureEvent;

/// Installs the signal handlers and spawns a task forwarding each signal as
/// a pressure event.
///
/// Handlers are installed before this returns, so a signal sent right after
/// the call is not lost. The task ends when the receiving side is dropped.
pub fn spawn_signal_forwarder(events: mpsc::Sender<PressureEvent>) -> io::Result<JoinHandle<()>> {
    let mut memory_warning = signal(SignalKind::user_defined1())?;
    let mut background = signal(SignalKind::user_defined2())?;

    Ok(tokio::spawn(async move {
        info!("Forwarding SIGUSR1 as memory warning, SIGUSR2 as background");

        loop {
            let event = tokio::select! {
                Some(()) = memory_warning.recv() => PressureEvent::MemoryWarning,
                Some(()) = background.recv() => PressureEvent::EnteredBackground,
                else => break,
            };

            debug!(%event, "Signal received");
            if events.send(event).await.is_err() {
                break;
            }
        }

        debug!("Signal forwarder stopped");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forwarder_can_be_aborted() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = spawn_signal_forwarder(tx).unwrap();

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
