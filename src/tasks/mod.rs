//! Background Tasks Module
//!
//! Tasks that clear the cache in response to process-wide events.
//!
//! # Tasks
//! - Pressure listener: clears the cache on memory warnings and when the
//!   process is sent to the background
//! - Signal forwarder (unix): turns `SIGUSR1`/`SIGUSR2` into pressure events

mod pressure;
#[cfg(unix)]
mod signals;

pub use pressure::{shared, spawn_pressure_listener, PressureEvent, PressurePolicy, SharedCache};
#[cfg(unix)]
pub use signals::spawn_signal_forwarder;
