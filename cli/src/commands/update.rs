//! `qnode update`: replace the node binaries with the latest release.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::update::{UpdateMode, update_node};
use crate::commands::HostPorts;

#[derive(Args)]
pub struct UpdateArgs {
    /// Only report whether a newer release exists
    #[arg(long, conflicts_with = "force")]
    pub check: bool,

    /// Reinstall the latest release even if it is not newer
    #[arg(long)]
    pub force: bool,
}

impl UpdateArgs {
    fn mode(&self) -> UpdateMode {
        match (self.check, self.force) {
            (true, _) => UpdateMode::Check,
            (false, true) => UpdateMode::Force,
            (false, false) => UpdateMode::Apply,
        }
    }
}

/// Run the update command.
///
/// # Errors
///
/// Returns an error if nothing is installed or any update step fails.
pub async fn run(app: &AppContext, args: &UpdateArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let paths = app.paths(&config)?;
    let platform = app.platform()?;
    let mode = args.mode();
    if mode != UpdateMode::Check {
        platform.require_systemd()?;
    }
    let ports = HostPorts::new(&config);

    let outcome = update_node(
        &ports.host(&app.state_mgr),
        &app.reporter(),
        &config,
        &paths,
        &platform,
        mode,
    )
    .await?;
    app.renderer().render_update(&outcome)?;
    Ok(ExitCode::SUCCESS)
}
