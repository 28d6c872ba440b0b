//! Application service: update the installed node binaries.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::application::ports::{
    FileHasher, InstallRecordStore, LocalFs, ProgressReporter, ReleaseClient, ServiceManager,
};
use crate::application::services::install::{NodeHost, stage_client};
use crate::application::services::{release, service};
use crate::domain::config::{NodePaths, QnodeConfig};
use crate::domain::error::InstallError;
use crate::domain::install::InstallRecord;
use crate::domain::manifest::NODE_PREFIX;
use crate::domain::platform::Platform;

/// How far to go once a newer release is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Report only.
    Check,
    /// Apply if newer.
    Apply,
    /// Reinstall the latest release even if it is not newer.
    Force,
}

/// Result of an update run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Installed release is the latest.
    UpToDate { version: String },
    /// A newer release exists (check mode).
    Available { current: String, latest: String },
    /// Binaries were replaced and the service restarted.
    Updated { from: String, to: String },
}

/// Compare the installed node against the release listing and, unless in
/// check mode, replace the binaries and restart the service.
///
/// # Errors
///
/// Returns `InstallError::NotInstalled` without an install record, or any
/// download, verification, or service error.
pub async fn update_node<R, C, F, M, S, G>(
    host: &NodeHost<'_, R, C, F, M, S, G>,
    reporter: &impl ProgressReporter,
    config: &QnodeConfig,
    paths: &NodePaths,
    platform: &Platform,
    mode: UpdateMode,
) -> Result<UpdateOutcome>
where
    C: ReleaseClient,
    F: LocalFs + FileHasher,
    M: ServiceManager,
    S: InstallRecordStore,
{
    let Some(record) = host.records.load_async().await? else {
        return Err(InstallError::NotInstalled.into());
    };

    let manifest =
        release::fetch_platform_manifest(host.release, &config.release.manifest_url, platform)?;
    let latest = manifest.binary(NODE_PREFIX)?.clone();
    let latest_version = latest.version()?;
    let current = record.node_version.clone();
    let newer = record.version().is_none_or(|v| latest_version > v);
    tracing::debug!(%current, latest = %latest_version, newer, "compared releases");

    match mode {
        UpdateMode::Check if newer => {
            return Ok(UpdateOutcome::Available {
                current,
                latest: latest_version.to_string(),
            });
        }
        UpdateMode::Check | UpdateMode::Apply if !newer => {
            return Ok(UpdateOutcome::UpToDate { version: current });
        }
        _ => {}
    }

    release::clear_staging(host.fs, &paths.staging_dir)?;
    let node = release::download_release(
        host.release,
        host.fs,
        reporter,
        &manifest,
        NODE_PREFIX,
        &config.release.artifact_base_url,
        &paths.staging_dir.join("node"),
    )?;
    let client = if config.release.include_client {
        stage_client(host, reporter, config, platform, &paths.staging_dir.join("client"))?
    } else {
        None
    };

    service::stop_for_replace(
        host.services,
        reporter,
        Some(record.service_name.as_str()),
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

    let updated = InstallRecord {
        node_binary: node.binary.name.clone(),
        node_version: latest_version.to_string(),
        client_binary: client.map(|c| c.binary.name).or(record.client_binary),
        platform: *platform,
        service_name: config.service.name.clone(),
        installed_at: Utc::now(),
    };
    host.records.save_async(&updated).await?;
    tracing::info!(from = %current, to = %latest_version, "node updated");

    Ok(UpdateOutcome::Updated {
        from: current,
        to: latest_version.to_string(),
    })
}
