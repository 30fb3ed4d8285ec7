//! Configuration persistence
//!
//! Saves and loads the [`Configuration`] as a JSON document at
//! [`CONFIG_PATH`] on any [`Filesystem`]. Every failure is returned to the
//! caller; the store never logs and never falls back on its own.

use core::fmt;

use airsense_hal::{Filesystem, FsError};

use crate::config::{Configuration, FieldError};
use crate::document::{self, DecodeError, MAX_DOCUMENT_SIZE};

/// Path of the persisted configuration file
pub const CONFIG_PATH: &str = "/conf.json";

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Filesystem operation failed
    Storage(FsError),
    /// Stored document could not be decoded
    Decode(DecodeError),
    /// Configuration does not fit the document buffer
    Encode,
    /// Stored value does not fit its field
    Field(FieldError),
}

impl From<FsError> for ConfigError {
    fn from(e: FsError) -> Self {
        ConfigError::Storage(e)
    }
}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        ConfigError::Field(e)
    }
}

impl From<DecodeError> for ConfigError {
    fn from(e: DecodeError) -> Self {
        ConfigError::Decode(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Storage(e) => write!(f, "storage: {}", e),
            ConfigError::Decode(e) => write!(f, "decode: {}", e),
            ConfigError::Encode => f.write_str("encode: configuration too large"),
            ConfigError::Field(e) => write!(f, "field: {}", e),
        }
    }
}

/// Result of a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// Configuration replaced with the stored values
    Loaded,
    /// No configuration file; configuration left unchanged
    NotFound,
}

/// Configuration store
///
/// Owns the filesystem the configuration lives on.
pub struct ConfigStore<F> {
    fs: F,
}

impl<F: Filesystem> ConfigStore<F> {
    /// Create a new store over a filesystem
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Borrow the underlying filesystem
    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Mutably borrow the underlying filesystem
    pub fn filesystem_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    /// Consume the store and return the underlying filesystem
    pub fn into_filesystem(self) -> F {
        self.fs
    }

    /// Persist a configuration
    ///
    /// Replaces any previous file. Returns the number of bytes written.
    /// Nothing is written if the volume cannot be mounted.
    pub fn save(&mut self, config: &Configuration) -> Result<usize, ConfigError> {
        let mut buffer = [0u8; MAX_DOCUMENT_SIZE];
        let len = document::encode(config, &mut buffer)?;

        self.fs.mount()?;
        self.fs.write(CONFIG_PATH, &buffer[..len])?;
        Ok(len)
    }

    /// Load the persisted configuration into `config`
    ///
    /// `config` is replaced wholesale on [`LoadOutcome::Loaded`] and left
    /// untouched otherwise, including on every error.
    pub fn load(&mut self, config: &mut Configuration) -> Result<LoadOutcome, ConfigError> {
        self.fs.mount()?;
        if !self.fs.exists(CONFIG_PATH)? {
            return Ok(LoadOutcome::NotFound);
        }

        let mut buffer = [0u8; MAX_DOCUMENT_SIZE];
        let len = self.fs.read(CONFIG_PATH, &mut buffer)?;

        *config = document::decode(&buffer[..len])?;
        Ok(LoadOutcome::Loaded)
    }

    /// Load the persisted configuration, starting from defaults
    ///
    /// Always yields a usable configuration; the second element reports
    /// whether the stored one was applied.
    pub fn load_or_default(&mut self) -> (Configuration, Result<LoadOutcome, ConfigError>) {
        let mut config = Configuration::default();
        let result = self.load(&mut config);
        (config, result)
    }

    /// Remove the persisted configuration
    pub fn erase(&mut self) -> Result<(), ConfigError> {
        self.fs.mount()?;
        self.fs.remove(CONFIG_PATH)?;
        Ok(())
    }
}
