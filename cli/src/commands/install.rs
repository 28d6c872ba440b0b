//! `qnode install`: clone, download, install the service, patch the config.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::install::{InstallPlan, install_node};
use crate::commands::HostPorts;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Skip the qclient binary even if `release.include_client` is set
    #[arg(long)]
    pub no_client: bool,

    /// Seconds to wait for the node to write its config (overrides config)
    #[arg(long, value_name = "SECS")]
    pub config_wait: Option<u64>,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if any install step fails.
pub async fn run(app: &AppContext, args: &InstallArgs) -> Result<ExitCode> {
    let mut config = app.config()?;
    if args.no_client {
        config.release.include_client = false;
    }
    let paths = app.paths(&config)?;
    let platform = app.platform()?;
    let ports = HostPorts::new(&config);

    let plan = InstallPlan {
        config: &config,
        paths: &paths,
        platform,
        config_wait: args.config_wait.map(Duration::from_secs),
    };
    let outcome = install_node(&ports.host(&app.state_mgr), &app.reporter(), &plan).await?;
    app.renderer().render_install(&outcome)?;
    Ok(ExitCode::SUCCESS)
}
