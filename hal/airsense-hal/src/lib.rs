//! Airsense Hardware Abstraction Layer
//!
//! This crate defines the storage abstraction that chip-specific HALs
//! implement, so the configuration store in `airsense-core` runs the same
//! way on flash, on a RAM disk, or on the host under test.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  airsense-core / airsense-firmware      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  airsense-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ airsense-hal- │       │    RamFs      │
//! │    rp2040     │       │ (this crate)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`fs::Filesystem`] - Whole-file persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod fs;
pub mod ram;

// Re-export key types at crate root for convenience
pub use fs::{FileKey, Filesystem, FsError};
pub use ram::RamFs;
