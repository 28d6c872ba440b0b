//! qnode - Quilibrium node installer

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qnode_cli::cli::Cli;
use qnode_cli::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json
                && let Ok(obj) = format_error(&format!("{e:#}"), error_code(&e))
            {
                println!("{obj}");
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Stable machine-readable code for `--json` error objects.
fn error_code(e: &anyhow::Error) -> &'static str {
    use qnode_cli::domain::error::{
        ConfigError, DigestError, InstallError, ManifestError, NodeConfigError, PlatformError,
        SnapshotError, UnitError,
    };
    if e.downcast_ref::<PlatformError>().is_some() {
        "PLATFORM"
    } else if e.downcast_ref::<ManifestError>().is_some() {
        "MANIFEST"
    } else if e.downcast_ref::<DigestError>().is_some() {
        "DIGEST"
    } else if e.downcast_ref::<UnitError>().is_some() {
        "UNIT"
    } else if e.downcast_ref::<NodeConfigError>().is_some() {
        "NODE_CONFIG"
    } else if e.downcast_ref::<ConfigError>().is_some() {
        "CONFIG"
    } else if e.downcast_ref::<InstallError>().is_some() {
        "INSTALL"
    } else if e.downcast_ref::<SnapshotError>().is_some() {
        "SNAPSHOT"
    } else {
        "ERROR"
    }
}
