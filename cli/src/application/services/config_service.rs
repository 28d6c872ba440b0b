//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{QnodeConfig, set_config_value};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<QnodeConfig> {
    store.load()
}

/// Save configuration.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
pub fn save_config(store: &impl ConfigStore, config: &QnodeConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist a single `key = value` change, returning the new config.
///
/// # Errors
///
/// Returns an error for unknown keys, invalid values, or a failed save.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<QnodeConfig> {
    let mut config = store.load()?;
    set_config_value(&mut config, key, value)?;
    store.save(&config)?;
    tracing::debug!(key, value, "config updated");
    Ok(config)
}
