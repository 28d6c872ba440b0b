//! Application service: full node install.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::application::ports::{
    CommandRunner, FileHasher, InstallRecordStore, LocalFs, ProgressReporter, ReleaseClient,
    ServiceManager, SourceFetcher,
};
use crate::application::services::{node_config, release, service};
use crate::domain::config::{NodePaths, QnodeConfig};
use crate::domain::error::{InstallError, ManifestError};
use crate::domain::install::InstallRecord;
use crate::domain::manifest::{CLIENT_PREFIX, NODE_PREFIX};
use crate::domain::node_config::PatchReport;
use crate::domain::platform::Platform;

/// Timeout for tool probes like `git --version`.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// The ports an install or update touches.
pub struct NodeHost<'a, R, C, F, M, S, G> {
    pub runner: &'a R,
    pub release: &'a C,
    pub fs: &'a F,
    pub services: &'a M,
    pub records: &'a S,
    pub source: &'a G,
}

/// Inputs fixed for one install run.
pub struct InstallPlan<'a> {
    pub config: &'a QnodeConfig,
    pub paths: &'a NodePaths,
    pub platform: Platform,
    /// Override for the config wait (tests); `None` uses `node.config_wait_secs`.
    pub config_wait: Option<Duration>,
}

/// What the install did.
#[derive(Debug)]
pub struct InstallOutcome {
    pub record: InstallRecord,
    pub was_running: bool,
    pub config: PatchReport,
}

/// Check that `git` and (on Linux) `systemctl` can be executed.
///
/// # Errors
///
/// Returns `InstallError::MissingTool` naming the first missing tool, or
/// `PlatformError::NoSystemd` on hosts without systemd.
pub async fn check_prerequisites(runner: &impl CommandRunner, platform: &Platform) -> Result<()> {
    platform.require_systemd()?;
    for tool in ["git", "systemctl"] {
        let ok = runner
            .run_with_timeout(tool, &["--version"], PROBE_TIMEOUT)
            .await
            .is_ok_and(|o| o.status.success());
        if !ok {
            return Err(InstallError::MissingTool(tool.to_string()).into());
        }
        tracing::debug!(tool, "prerequisite present");
    }
    Ok(())
}

/// Install the node from scratch (or over an existing install).
///
/// Clones the source tree, downloads and verifies the platform binaries,
/// stops the running service before replacing any file, installs and starts
/// the unit, waits for the node to write its config, patches it, and saves
/// the install record.
///
/// # Errors
///
/// Returns an error if any step fails. Completed steps are not rolled back.
pub async fn install_node<R, C, F, M, S, G>(
    host: &NodeHost<'_, R, C, F, M, S, G>,
    reporter: &impl ProgressReporter,
    plan: &InstallPlan<'_>,
) -> Result<InstallOutcome>
where
    R: CommandRunner,
    C: ReleaseClient,
    F: LocalFs + FileHasher,
    M: ServiceManager,
    S: InstallRecordStore,
    G: SourceFetcher,
{
    let InstallPlan { config, paths, platform, .. } = plan;

    reporter.step("Checking prerequisites");
    check_prerequisites(host.runner, platform).await?;

    reporter.step(&format!("Syncing source into {}", paths.install_dir.display()));
    host.source
        .sync(&config.source.repo_url, &config.source.branch, &paths.install_dir)
        .await
        .context("syncing node source tree")?;

    reporter.step(&format!("Fetching release for {platform}"));
    let manifest =
        release::fetch_platform_manifest(host.release, &config.release.manifest_url, platform)?;
    let node_staging = paths.staging_dir.join("node");
    let client_staging = paths.staging_dir.join("client");
    release::clear_staging(host.fs, &paths.staging_dir)?;

    let node = release::download_release(
        host.release,
        host.fs,
        reporter,
        &manifest,
        NODE_PREFIX,
        &config.release.artifact_base_url,
        &node_staging,
    )?;
    let node_version = node.binary.version()?;
    let client = if config.release.include_client {
        stage_client(host, reporter, config, platform, &client_staging)?
    } else {
        None
    };

    let previous = host.records.load_async().await?.map(|r| r.service_name);
    let was_running = service::stop_for_replace(
        host.services,
        reporter,
        previous.as_deref(),
        &config.service.name,
    )
    .await?;

    let node_binary = release::promote_staged(host.fs, &node, &paths.node_dir)?;
    if let Some(client) = &client {
        release::promote_staged(host.fs, client, &paths.client_dir)?;
    }
    release::clear_staging(host.fs, &paths.staging_dir)?;

    let unit = service::node_unit(&config.service, &paths.node_dir, &node_binary)?;
    service::install_and_start(host.services, reporter, &unit).await?;

    let wait = plan
        .config_wait
        .unwrap_or_else(|| Duration::from_secs(config.node.config_wait_secs));
    let interval = node_config::CONFIG_POLL_INTERVAL
        .min(wait)
        .max(Duration::from_millis(10));
    reporter.step("Waiting for the node to write its config");
    node_config::wait_for_config(host.fs, &paths.node_config, wait, interval).await?;
    let report = node_config::patch_node_config(
        host.fs,
        reporter,
        &paths.node_config,
        &config.node.settings(),
    )?;
    if report.is_changed() {
        service::restart(host.services, reporter, &config.service.name).await?;
    }

    let record = InstallRecord {
        node_version: node_version.to_string(),
        node_binary: node.binary.name.clone(),
        client_binary: client.map(|c| c.binary.name),
        platform: *platform,
        service_name: config.service.name.clone(),
        installed_at: Utc::now(),
    };
    host.records.save_async(&record).await?;
    tracing::info!(binary = %record.node_binary, "node installed");

    Ok(InstallOutcome {
        record,
        was_running,
        config: report,
    })
}

/// Download the client release, tolerating a platform without a client build.
pub(crate) fn stage_client<R, C, F, M, S, G>(
    host: &NodeHost<'_, R, C, F, M, S, G>,
    reporter: &impl ProgressReporter,
    config: &QnodeConfig,
    platform: &Platform,
    staging: &std::path::Path,
) -> Result<Option<release::StagedRelease>>
where
    C: ReleaseClient,
    F: LocalFs + FileHasher,
{
    let manifest = match release::fetch_platform_manifest(
        host.release,
        &config.release.client_manifest_url,
        platform,
    ) {
        Ok(m) => m,
        Err(e) if e.downcast_ref::<ManifestError>().is_some() => {
            reporter.warn(&format!("No client release for {platform}; skipping client"));
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    if manifest.binary(CLIENT_PREFIX).is_err() {
        reporter.warn(&format!("No client release for {platform}; skipping client"));
        return Ok(None);
    }
    let staged = release::download_release(
        host.release,
        host.fs,
        reporter,
        &manifest,
        CLIENT_PREFIX,
        &config.release.artifact_base_url,
        staging,
    )?;
    Ok(Some(staged))
}
