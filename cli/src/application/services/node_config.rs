//! Node config use-cases: wait for the file, patch it.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{LocalFs, ProgressReporter, ServiceManager};
use crate::application::services::service;
use crate::domain::error::NodeConfigError;
use crate::domain::node_config::{
    NodeSettings, PatchOutcome, PatchReport, apply_patches, default_patches, inspect,
};

/// Poll interval while waiting for the node to write its config.
pub const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wait until `path` exists, polling every `interval` for at most `timeout`.
///
/// # Errors
///
/// Returns `NodeConfigError::WaitTimedOut` if the file never appears.
pub async fn wait_for_config(
    fs: &impl LocalFs,
    path: &Path,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if fs.exists(path) {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(NodeConfigError::WaitTimedOut {
                path: path.display().to_string(),
                secs: timeout.as_secs(),
            }
            .into());
        }
        tokio::time::sleep(interval).await;
    }
}

/// Apply the three node settings to the config at `path`, writing only when
/// something changed.
///
/// # Errors
///
/// Returns `NodeConfigError::NotFound` if the file is absent, or an I/O error.
pub fn patch_node_config(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    path: &Path,
    settings: &NodeSettings,
) -> Result<PatchReport> {
    if !fs.exists(path) {
        return Err(NodeConfigError::NotFound(path.display().to_string()).into());
    }
    let original = fs.read_to_string(path)?;
    let report = apply_patches(&original, &default_patches(settings));

    for (key, outcome) in &report.outcomes {
        match outcome {
            PatchOutcome::Patched => reporter.success(&format!("Set {key}")),
            PatchOutcome::AlreadySet => tracing::debug!(key, "already set"),
            PatchOutcome::Missing => {
                reporter.warn(&format!("{key} not found in {}; left unchanged", path.display()));
            }
        }
    }

    if report.is_changed() {
        fs.write(path, &report.text)?;
        tracing::info!(path = %path.display(), "node config patched");
    }
    Ok(report)
}

/// Read-only view of which keys are patched, for `status`.
///
/// Returns `None` when the node has not written its config yet.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn node_config_state(
    fs: &impl LocalFs,
    path: &Path,
    settings: &NodeSettings,
) -> Result<Option<Vec<(&'static str, PatchOutcome)>>> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let text = fs.read_to_string(path)?;
    Ok(Some(inspect(&text, &default_patches(settings))))
}

/// Patch the node config and restart the service when it changed, unless
/// `restart` is false.
///
/// Returns the patch report and whether the service was restarted.
///
/// # Errors
///
/// Returns `NodeConfigError::NotFound` if the node has not written its
/// config yet, or an error from the write or the restart.
pub async fn configure_node(
    fs: &impl LocalFs,
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    path: &Path,
    settings: &NodeSettings,
    service_name: &str,
    restart: bool,
) -> Result<(PatchReport, bool)> {
    let report = patch_node_config(fs, reporter, path, settings)?;
    if !report.is_changed() {
        reporter.success("Node config already up to date");
        return Ok((report, false));
    }
    if !restart {
        reporter.warn(&format!("Restart {service_name} to apply the new settings"));
        return Ok((report, false));
    }
    service::restart(svc, reporter, service_name).await?;
    Ok((report, true))
}
