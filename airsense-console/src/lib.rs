//! Serial configuration console
//!
//! A line-oriented text protocol for inspecting and editing the device
//! configuration over a UART:
//!
//! ```text
//! > set mqtt_server broker.local
//! ok
//! > show
//! mqtt_server: broker.local
//! mqtt_topic: esp8266-vindriktning-particle-sensor/%s
//! username:
//! password:
//! coap_server:
//! > save
//! saved 130 bytes
//! ```
//!
//! Bytes are framed into lines by [`LineReader`], parsed into a
//! [`Command`] and applied by [`execute`]. Responses are plain text written
//! to any `core::fmt::Write`.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod exec;
pub mod line;

pub use command::{Command, ParseError};
pub use exec::{execute, handle_line, Outcome};
pub use line::{Line, LineError, LineReader, MAX_LINE_LEN};
