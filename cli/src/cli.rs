//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Install and run a Quilibrium node as a systemd service
#[derive(Parser)]
#[command(
    name = "qnode",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Assume yes for confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clone the source, download the node, install and start the service
    Install(commands::install::InstallArgs),

    /// Update the node binaries to the latest release
    Update(commands::update::UpdateArgs),

    /// Patch the node config with the configured settings
    Configure(commands::configure::ConfigureArgs),

    /// Replace the node store with a snapshot archive
    Snapshot(commands::snapshot::SnapshotArgs),

    /// Manage the node service
    #[command(subcommand)]
    Service(commands::service::ServiceCommand),

    /// Show install and service status
    Status,

    /// Manage installer configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Log filter directive implied by `-v` flags.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let flags = AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags { yes: self.yes },
        };
        let app = AppContext::new(&flags)?;

        match self.command {
            Command::Install(args) => commands::install::run(&app, &args).await,
            Command::Update(args) => commands::update::run(&app, &args).await,
            Command::Configure(args) => commands::configure::run(&app, &args).await,
            Command::Snapshot(args) => commands::snapshot::run(&app, &args).await,
            Command::Service(cmd) => commands::service::run(&app, cmd).await,
            Command::Status => commands::status::run(&app).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
