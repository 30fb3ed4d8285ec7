//! Configuration types
//!
//! The device configuration: five bounded text fields persisted as a JSON
//! document.

pub mod fields;
pub mod summary;
pub mod types;

pub use fields::*;
pub use summary::ConfigSummary;
pub use types::*;
