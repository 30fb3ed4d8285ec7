//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use airsense_console::Outcome;

/// Signal that the persisted configuration changed or was re-applied
///
/// Raised by the console task after a successful save, load or erase.
/// The main task waits on it and logs each change.
pub static CONFIG_CHANGED: Signal<CriticalSectionRawMutex, Outcome> = Signal::new();
