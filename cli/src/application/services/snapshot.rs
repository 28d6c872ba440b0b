//! Application service: restore the node data store from a snapshot archive.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{
    ArchiveExtractor, LocalFs, ProgressReporter, ReleaseClient, ServiceManager,
};
use crate::application::services::service;
use crate::domain::config::{NodePaths, QnodeConfig};
use crate::domain::error::SnapshotError;

/// Archive filename used when the URL has no usable last segment.
const FALLBACK_ARCHIVE_NAME: &str = "snapshot.archive";

/// What the restore did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    pub url: String,
    pub bytes: u64,
    pub entries: u64,
    pub store_dir: PathBuf,
}

/// Pick the snapshot URL: explicit flag first, then config.
///
/// # Errors
///
/// Returns `SnapshotError::NoUrl` when neither is set.
pub fn resolve_url(flag: Option<&str>, config: &QnodeConfig) -> Result<String> {
    flag.map(str::to_string)
        .or_else(|| config.snapshot.url.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| SnapshotError::NoUrl.into())
}

/// Filename for the downloaded archive, taken from the URL path.
#[must_use]
pub fn archive_name(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|u| u.rsplit('/').next())
        .filter(|n| !n.is_empty() && !n.contains(':'))
        .unwrap_or(FALLBACK_ARCHIVE_NAME)
        .to_string()
}

/// Download the archive into `download_dir`, stop the service, replace the
/// store directory with the archive contents, and start the service again.
///
/// The previous store is deleted before extraction and is not restored if
/// extraction fails.
///
/// # Errors
///
/// Returns an error if the download, stop, extraction, or start fails, or if
/// the archive does not contain a `store` directory.
#[allow(clippy::too_many_arguments)]
pub async fn restore_snapshot(
    client: &impl ReleaseClient,
    extractor: &impl ArchiveExtractor,
    fs: &impl LocalFs,
    svc: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    url: &str,
    paths: &NodePaths,
    service_name: &str,
    download_dir: &Path,
) -> Result<SnapshotOutcome> {
    let archive = download_dir.join(archive_name(url));
    reporter.step(&format!("Downloading snapshot from {url}"));
    let bytes = client
        .download(url, &archive, reporter.show_progress())
        .with_context(|| format!("downloading snapshot {url}"))?;
    reporter.success(&format!("Downloaded {}", archive_name(url)));

    let was_running = service::stop_if_running(svc, reporter, service_name).await?;

    if fs.exists(&paths.store_dir) {
        reporter.step(&format!("Removing {}", paths.store_dir.display()));
        fs.remove_dir_all(&paths.store_dir)?;
    }
    fs.create_dir_all(&paths.config_dir)?;

    reporter.step(&format!("Extracting into {}", paths.config_dir.display()));
    let entries = extractor
        .extract(&archive, &paths.config_dir, reporter.show_progress())
        .context("extracting snapshot")?;

    if !fs.exists(&paths.store_dir) {
        return Err(SnapshotError::StoreMissing(paths.store_dir.display().to_string()).into());
    }
    reporter.success(&format!("Restored {entries} entries"));

    if was_running || svc.unit_installed(service_name) {
        service::start(svc, reporter, service_name).await?;
    }

    Ok(SnapshotOutcome {
        url: url.to_string(),
        bytes,
        entries,
        store_dir: paths.store_dir.clone(),
    })
}
