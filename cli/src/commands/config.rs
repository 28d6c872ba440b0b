//! `qnode config`: show and set installer configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key, e.g. `node.max_frames`
        key: String,
        /// Configuration value
        value: String,
    },
    /// Print the config file path
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error for unknown keys, invalid values, or unreadable config.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let config = config_service::load_config(&app.config_store)?;
            let path = app.config_store.path()?;
            app.renderer().render_config(&config, &path)?;
        }
        ConfigCommand::Set { key, value } => {
            config_service::set_value(&app.config_store, &key, &value)?;
            app.renderer().render_config_set(&key, &value)?;
        }
        ConfigCommand::Path => {
            app.renderer().render_config_path(&app.config_store.path()?)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
