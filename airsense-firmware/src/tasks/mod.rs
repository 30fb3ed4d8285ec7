//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod console;

pub use console::console_task;
