//! Service unit installation and control.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{InstallRecordStore, LocalFs, ProgressReporter, ServiceManager};
use crate::domain::config::{NodePaths, ServiceConfig};
use crate::domain::error::InstallError;
use crate::domain::unit::ServiceUnit;

/// Build the unit that runs `binary` from `working_dir`.
///
/// # Errors
///
/// Returns an error if the service name is invalid or the paths are relative.
pub fn node_unit(service: &ServiceConfig, working_dir: &Path, binary: &Path) -> Result<ServiceUnit> {
    let unit = ServiceUnit::new(
        &service.name,
        &service.description,
        &working_dir.to_string_lossy(),
        &binary.to_string_lossy(),
        service.user.as_deref(),
    )?;
    Ok(unit)
}

/// Name of the unit running the node: the recorded one after an install,
/// otherwise the configured one.
///
/// # Errors
///
/// Returns an error if the install record cannot be read.
pub async fn active_name(records: &impl InstallRecordStore, service: &ServiceConfig) -> Result<String> {
    Ok(records
        .load_async()
        .await?
        .map_or_else(|| service.name.clone(), |r| r.service_name))
}

/// Stop the node before its files are replaced.
///
/// When `previous` names a different unit than `current` (`service.name` was
/// changed since the last install) the old unit is stopped and disabled so a
/// single unit runs the node afterwards.
///
/// Returns `true` if either unit was running.
///
/// # Errors
///
/// Returns an error if a state query, stop or disable command fails.
pub async fn stop_for_replace(
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    previous: Option<&str>,
    current: &str,
) -> Result<bool> {
    let mut was_running = false;
    if let Some(old) = previous.filter(|old| *old != current) {
        was_running |= retire_unit(svc, reporter, old).await?;
    }
    was_running |= stop_if_running(svc, reporter, current).await?;
    Ok(was_running)
}

/// Stop and disable a unit that no longer runs the node.
async fn retire_unit(
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    name: &str,
) -> Result<bool> {
    tracing::info!(service = name, "retiring renamed unit");
    let was_running = stop_if_running(svc, reporter, name).await?;
    svc.disable(name)
        .await
        .with_context(|| format!("disabling {name}"))?;
    reporter.success(&format!("Disabled {name}"));
    Ok(was_running)
}

/// (Re)install the unit for the recorded node binary, then enable and start it.
///
/// Returns the unit the service now runs.
///
/// # Errors
///
/// Returns `InstallError::NotInstalled` without an install record or when the
/// recorded binary is missing from the node directory.
///
/// A recorded unit under a different name is stopped and disabled first, and
/// the record is updated to the new name.
pub async fn install_service(
    svc: &impl ServiceManager,
    records: &impl InstallRecordStore,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    service: &ServiceConfig,
    paths: &NodePaths,
) -> Result<ServiceUnit> {
    let Some(mut record) = records.load_async().await? else {
        return Err(InstallError::NotInstalled.into());
    };
    let binary = paths.node_dir.join(&record.node_binary);
    if !fs.exists(&binary) {
        tracing::warn!(binary = %binary.display(), "recorded binary missing");
        return Err(InstallError::NotInstalled.into());
    }
    let unit = node_unit(service, &paths.node_dir, &binary)?;
    if record.service_name != unit.name {
        retire_unit(svc, reporter, &record.service_name).await?;
    }
    install_and_start(svc, reporter, &unit).await?;
    if record.service_name != unit.name {
        record.service_name.clone_from(&unit.name);
        records.save_async(&record).await?;
    }
    Ok(unit)
}

/// Stop the service if it is running, with a spinner until `stop` returns.
///
/// Returns `true` if the service was running.
///
/// # Errors
///
/// Returns an error if the state query or the stop command fails.
pub async fn stop_if_running(
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    name: &str,
) -> Result<bool> {
    let state = svc.state(name).await?;
    if !state.is_running() {
        tracing::debug!(service = name, %state, "service not running, nothing to stop");
        return Ok(false);
    }
    stop_with_spinner(svc, reporter, name).await?;
    Ok(true)
}

/// Stop the service, drawing a spinner while the stop command runs.
///
/// # Errors
///
/// Returns an error if the stop command fails.
pub async fn stop_with_spinner(
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    name: &str,
) -> Result<()> {
    reporter.wait_started(&format!("Stopping {name}..."));
    let result = svc.stop(name).await;
    if result.is_ok() {
        reporter.wait_finished(true, &format!("Stopped {name}"));
    } else {
        reporter.wait_finished(false, &format!("Failed to stop {name}"));
    }
    result.with_context(|| format!("stopping {name}"))
}

/// Write the unit, reload systemd, enable and start the service.
///
/// # Errors
///
/// Returns an error if any systemd step fails.
pub async fn install_and_start(
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    unit: &ServiceUnit,
) -> Result<()> {
    let path = svc
        .install_unit(unit)
        .await
        .with_context(|| format!("installing {}", unit.file_name()))?;
    reporter.success(&format!("Wrote {}", path.display()));
    svc.daemon_reload().await.context("reloading systemd")?;
    svc.enable(&unit.name)
        .await
        .with_context(|| format!("enabling {}", unit.name))?;
    svc.start(&unit.name)
        .await
        .with_context(|| format!("starting {}", unit.name))?;
    reporter.success(&format!("Started {}", unit.name));
    Ok(())
}

/// Start the service.
///
/// # Errors
///
/// Returns an error if the start command fails.
pub async fn start(svc: &impl ServiceManager, reporter: &impl ProgressReporter, name: &str) -> Result<()> {
    svc.start(name).await.with_context(|| format!("starting {name}"))?;
    reporter.success(&format!("Started {name}"));
    Ok(())
}

/// Restart the service.
///
/// # Errors
///
/// Returns an error if the restart command fails.
pub async fn restart(svc: &impl ServiceManager, reporter: &impl ProgressReporter, name: &str) -> Result<()> {
    svc.restart(name)
        .await
        .with_context(|| format!("restarting {name}"))?;
    reporter.success(&format!("Restarted {name}"));
    Ok(())
}
