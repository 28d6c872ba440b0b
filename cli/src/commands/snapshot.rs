//! `qnode snapshot`: replace the node store with a downloaded snapshot.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::service;
use crate::application::services::snapshot::{resolve_url, restore_snapshot};
use crate::commands::HostPorts;
use crate::domain::error::SnapshotError;
use crate::infra::archive::FsArchiveExtractor;

#[derive(Args)]
pub struct SnapshotArgs {
    /// Snapshot archive URL (zip or tar.gz); defaults to `snapshot.url`
    #[arg(long)]
    pub url: Option<String>,
}

/// Run the snapshot command.
///
/// # Errors
///
/// Returns an error if no URL is configured, the user declines, or any
/// restore step fails.
pub async fn run(app: &AppContext, args: &SnapshotArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let url = resolve_url(args.url.as_deref(), &config)?;
    let paths = app.paths(&config)?;
    app.platform()?.require_systemd()?;

    let prompt = format!(
        "Replace {} with the snapshot from {url}?",
        paths.store_dir.display()
    );
    if !app.confirm(&prompt, true)? {
        return Err(SnapshotError::Cancelled.into());
    }

    std::fs::create_dir_all(&paths.node_dir)
        .with_context(|| format!("creating {}", paths.node_dir.display()))?;
    // Keep the archive on the store's filesystem, not /tmp.
    let download_dir = tempfile::Builder::new()
        .prefix(".qnode-snapshot-")
        .tempdir_in(&paths.node_dir)
        .context("creating snapshot download directory")?;

    let ports = HostPorts::new(&config);
    let service_name = service::active_name(&app.state_mgr, &config.service).await?;
    let outcome = restore_snapshot(
        &ports.release,
        &FsArchiveExtractor,
        &ports.fs,
        &ports.services,
        &app.reporter(),
        &url,
        &paths,
        &service_name,
        download_dir.path(),
    )
    .await?;
    app.renderer().render_snapshot(&outcome)?;
    Ok(ExitCode::SUCCESS)
}
