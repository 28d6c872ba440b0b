//! `qnode status`: install record, service state, node config.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status::collect_status;
use crate::commands::HostPorts;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the platform is unsupported.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config()?;
    let paths = app.paths(&config)?;
    let platform = app.platform()?;
    let ports = HostPorts::new(&config);

    let report = collect_status(
        &app.state_mgr,
        &ports.services,
        &ports.fs,
        &config,
        &paths,
        platform,
    )
    .await;
    app.renderer().render_status(&report)?;
    Ok(ExitCode::SUCCESS)
}
