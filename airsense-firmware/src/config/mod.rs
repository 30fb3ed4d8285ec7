//! Configuration loading
//!
//! Loads the device configuration from flash at boot, falling back to
//! defaults.

pub mod persistence;

pub use persistence::load_at_boot;
