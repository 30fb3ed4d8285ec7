//! RP2040-specific HAL for the airsense firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `airsense-hal` traits:
//!
//! - Flash-backed filesystem (implements `airsense_hal::Filesystem`)

#![no_std]

pub mod flash_fs;

pub use flash_fs::Rp2040FlashFs;

// Re-export shared traits from airsense-hal for convenience
pub use airsense_hal::{FileKey, Filesystem, FsError};
