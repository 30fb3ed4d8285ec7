//! Configuration persistence at boot
//!
//! The store reports every failure; this is where they get logged and
//! turned into a fallback to defaults.

use defmt::*;

use airsense_core::config::{ConfigSummary, Configuration};
use airsense_core::store::{ConfigError, ConfigStore, LoadOutcome, CONFIG_PATH};
use airsense_hal::{Filesystem, FsError};

/// Load the configuration, or defaults if none can be loaded
pub fn load_at_boot<F: Filesystem>(store: &mut ConfigStore<F>) -> Configuration {
    info!("Loading configuration from {=str}...", CONFIG_PATH);

    let (config, result) = store.load_or_default();
    match result {
        Ok(LoadOutcome::Loaded) => {
            info!("Configuration loaded");
        }
        Ok(LoadOutcome::NotFound) => {
            info!("No stored configuration, using defaults");
        }
        Err(ConfigError::Storage(FsError::MountFailed)) => {
            warn!("Storage volume unavailable, using defaults");
        }
        Err(e) => {
            warn!("Failed to load configuration: {:?}, using defaults", e);
        }
    }

    log_config_summary(&config);
    config
}

/// Log every field, password redacted
pub fn log_config_summary(config: &Configuration) {
    info!("{}", ConfigSummary(config));
}
