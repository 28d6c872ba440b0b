//! `qnode service`: install the unit and control the node service.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::service;
use crate::commands::HostPorts;

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// Write the systemd unit for the installed node, enable and start it
    Install,
    /// Start the node service
    Start,
    /// Stop the node service (waits for the node to exit)
    Stop,
    /// Restart the node service
    Restart,
}

/// Run a service subcommand.
///
/// # Errors
///
/// Returns an error on hosts without systemd or if `systemctl` fails.
pub async fn run(app: &AppContext, cmd: ServiceCommand) -> Result<ExitCode> {
    let config = app.config()?;
    app.platform()?.require_systemd()?;
    let ports = HostPorts::new(&config);
    let reporter = app.reporter();
    let mut name = service::active_name(&app.state_mgr, &config.service).await?;

    let action = match cmd {
        ServiceCommand::Install => {
            let paths = app.paths(&config)?;
            let unit = service::install_service(
                &ports.services,
                &app.state_mgr,
                &ports.fs,
                &reporter,
                &config.service,
                &paths,
            )
            .await?;
            name = unit.name;
            "installed"
        }
        ServiceCommand::Start => {
            service::start(&ports.services, &reporter, &name).await?;
            "started"
        }
        ServiceCommand::Stop => {
            service::stop_with_spinner(&ports.services, &reporter, &name).await?;
            "stopped"
        }
        ServiceCommand::Restart => {
            service::restart(&ports.services, &reporter, &name).await?;
            "restarted"
        }
    };
    app.renderer().render_service_action(&name, action)?;
    Ok(ExitCode::SUCCESS)
}
