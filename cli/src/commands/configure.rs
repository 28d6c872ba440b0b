//! `qnode configure`: patch the node config and restart the service.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::node_config::configure_node;
use crate::application::services::service;
use crate::commands::HostPorts;

#[derive(Args)]
pub struct ConfigureArgs {
    /// Write the config but leave the service running as is
    #[arg(long)]
    pub no_restart: bool,
}

/// Run the configure command.
///
/// # Errors
///
/// Returns an error if the node config is missing or the restart fails.
pub async fn run(app: &AppContext, args: &ConfigureArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let paths = app.paths(&config)?;
    let ports = HostPorts::new(&config);
    let service_name = service::active_name(&app.state_mgr, &config.service).await?;

    let (report, restarted) = configure_node(
        &ports.fs,
        &ports.services,
        &app.reporter(),
        &paths.node_config,
        &config.node.settings(),
        &service_name,
        !args.no_restart,
    )
    .await?;
    app.renderer().render_configure(&report, restarted)?;
    Ok(ExitCode::SUCCESS)
}
