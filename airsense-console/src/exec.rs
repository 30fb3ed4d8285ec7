//! Command execution
//!
//! Applies commands to the configuration and the store and writes a
//! response. Store and field errors become `error: ...` response lines;
//! only write failures on the output are returned as errors.

use core::fmt::{self, Write};

use airsense_core::config::{ConfigSummary, Configuration};
use airsense_core::store::{ConfigStore, LoadOutcome};
use airsense_hal::Filesystem;

use crate::command::{Command, HELP};

/// What a command did to the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Nothing changed (queries and failed commands)
    Unchanged,
    /// In-memory configuration changed but is not persisted
    Modified,
    /// Configuration written to storage
    Saved,
    /// Configuration replaced from storage
    Loaded,
    /// Stored configuration removed
    Erased,
}

impl Outcome {
    /// Whether persisted state changed or was re-applied
    pub fn is_persistence_event(self) -> bool {
        matches!(self, Outcome::Saved | Outcome::Loaded | Outcome::Erased)
    }
}

/// Execute a parsed command
pub fn execute<F, W>(
    command: Command<'_>,
    config: &mut Configuration,
    store: &mut ConfigStore<F>,
    out: &mut W,
) -> Result<Outcome, fmt::Error>
where
    F: Filesystem,
    W: Write,
{
    match command {
        Command::Help => {
            for line in HELP {
                writeln!(out, "{}", line)?;
            }
            Ok(Outcome::Unchanged)
        }
        Command::Show => {
            write!(out, "{}", ConfigSummary(config))?;
            Ok(Outcome::Unchanged)
        }
        Command::Get(field) => {
            writeln!(out, "{}: {}", field.key(), config.redacted(field))?;
            Ok(Outcome::Unchanged)
        }
        Command::Set { field, value } => match config.set(field, value) {
            Ok(()) => {
                writeln!(out, "ok")?;
                Ok(Outcome::Modified)
            }
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Ok(Outcome::Unchanged)
            }
        },
        Command::Clear(field) => {
            config.clear(field);
            writeln!(out, "ok")?;
            Ok(Outcome::Modified)
        }
        Command::Topic(device_id) => {
            match config.topic(device_id) {
                Ok(topic) => writeln!(out, "topic: {}", topic)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            }
            Ok(Outcome::Unchanged)
        }
        Command::Save => match store.save(config) {
            Ok(len) => {
                writeln!(out, "saved {} bytes", len)?;
                Ok(Outcome::Saved)
            }
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Ok(Outcome::Unchanged)
            }
        },
        Command::Load => match store.load(config) {
            Ok(LoadOutcome::Loaded) => {
                writeln!(out, "loaded")?;
                Ok(Outcome::Loaded)
            }
            Ok(LoadOutcome::NotFound) => {
                writeln!(out, "no stored configuration")?;
                Ok(Outcome::Unchanged)
            }
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Ok(Outcome::Unchanged)
            }
        },
        Command::Defaults => {
            *config = Configuration::default();
            writeln!(out, "defaults restored (not saved)")?;
            Ok(Outcome::Modified)
        }
        Command::Erase => match store.erase() {
            Ok(()) => {
                writeln!(out, "erased")?;
                Ok(Outcome::Erased)
            }
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Ok(Outcome::Unchanged)
            }
        },
    }
}

/// Parse and execute one console line
///
/// Parse errors are written as `error: ...` lines.
pub fn handle_line<F, W>(
    line: &str,
    config: &mut Configuration,
    store: &mut ConfigStore<F>,
    out: &mut W,
) -> Result<Outcome, fmt::Error>
where
    F: Filesystem,
    W: Write,
{
    match Command::parse(line) {
        Ok(command) => execute(command, config, store, out),
        Err(e) => {
            writeln!(out, "error: {}", e)?;
            Ok(Outcome::Unchanged)
        }
    }
}
