//! Board-agnostic core logic for the airsense sensor firmware
//!
//! This crate contains everything about the device configuration that does
//! not depend on specific hardware:
//!
//! - Configuration type definitions with bounded fields
//! - JSON document encoding and decoding
//! - The configuration store (save/load over any `Filesystem`)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod document;
pub mod store;

pub use config::{Configuration, Field, FieldError};
pub use store::{ConfigError, ConfigStore, LoadOutcome, CONFIG_PATH};
