//! Release download and verification.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{FileHasher, LocalFs, ProgressReporter, ReleaseClient};
use crate::domain::digest::{DigestAlgorithm, ExpectedDigest};
use crate::domain::error::ManifestError;
use crate::domain::manifest::{Artifact, ArtifactKind, ReleaseManifest, artifact_url};
use crate::domain::platform::Platform;

/// Mode applied to downloaded executables.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Files of one release downloaded into a staging directory.
#[derive(Debug, Clone)]
pub struct StagedRelease {
    /// The executable.
    pub binary: Artifact,
    /// Every staged file (binary, digest, signatures) as `(name, path)`.
    pub files: Vec<(String, PathBuf)>,
}

/// Fetch a release listing and keep the entries for `platform`.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched or has nothing for the
/// platform.
pub fn fetch_platform_manifest(
    client: &impl ReleaseClient,
    manifest_url: &str,
    platform: &Platform,
) -> Result<ReleaseManifest> {
    tracing::debug!(%manifest_url, %platform, "fetching release manifest");
    let text = client
        .fetch_text(manifest_url)
        .with_context(|| format!("fetching release manifest {manifest_url}"))?;
    let tag = platform.release_tag();
    let manifest = ReleaseManifest::parse(&text).for_platform(&tag);
    if manifest.is_empty() {
        return Err(ManifestError::NoArtifacts(tag).into());
    }
    Ok(manifest)
}

/// Download the executable starting with `prefix` plus its companion files
/// into `staging`, verifying the `.dgst` checksum when one is published.
///
/// # Errors
///
/// Returns an error if the manifest has no unique binary, a download fails,
/// or a checksum does not match.
pub fn download_release(
    client: &impl ReleaseClient,
    fs: &(impl LocalFs + FileHasher),
    reporter: &impl ProgressReporter,
    manifest: &ReleaseManifest,
    prefix: &str,
    base_url: &str,
    staging: &Path,
) -> Result<StagedRelease> {
    let binary = manifest.binary(prefix)?.clone();
    fs.create_dir_all(staging)?;

    let mut files = Vec::new();
    for artifact in manifest.with_prefix(prefix) {
        let url = artifact_url(base_url, &artifact.name);
        let dest = staging.join(&artifact.name);
        let show = reporter.show_progress() && artifact.kind() == ArtifactKind::Binary;
        reporter.step(&format!("Downloading {}", artifact.name));
        let bytes = client
            .download(&url, &dest, show)
            .with_context(|| format!("downloading {url}"))?;
        tracing::debug!(file = %artifact.name, bytes, "downloaded artifact");
        files.push((artifact.name.clone(), dest));
    }

    verify_staged(fs, reporter, &binary, &files)?;
    Ok(StagedRelease { binary, files })
}

fn verify_staged(
    fs: &(impl LocalFs + FileHasher),
    reporter: &impl ProgressReporter,
    binary: &Artifact,
    files: &[(String, PathBuf)],
) -> Result<()> {
    let digest_name = binary.digest_name();
    let Some((_, digest_path)) = files.iter().find(|(n, _)| *n == digest_name) else {
        reporter.warn(&format!("No checksum published for {}; skipping verification", binary.name));
        return Ok(());
    };
    let Some((_, binary_path)) = files.iter().find(|(n, _)| *n == binary.name) else {
        anyhow::bail!("{} was not downloaded", binary.name);
    };

    let content = fs.read_to_string(digest_path)?;
    let expected = ExpectedDigest::parse(&digest_name, &content)?;
    let actual = match expected.algorithm {
        DigestAlgorithm::Sha256 => fs.sha256_file(binary_path)?,
        DigestAlgorithm::Sha3_256 => fs.sha3_256_file(binary_path)?,
    };
    expected.verify(&binary.name, &actual)?;
    reporter.success(&format!("Verified {}", binary.name));
    Ok(())
}

/// Move staged files into `dest_dir`, marking executables `0755`.
///
/// Callers must stop any service holding these files open first.
///
/// # Errors
///
/// Returns an error if a move or permission change fails.
pub fn promote_staged(fs: &impl LocalFs, staged: &StagedRelease, dest_dir: &Path) -> Result<PathBuf> {
    fs.create_dir_all(dest_dir)?;
    for (name, path) in &staged.files {
        let target = dest_dir.join(name);
        fs.rename(path, &target)?;
        if Artifact::new(name.clone()).kind() == ArtifactKind::Binary {
            fs.set_permissions(&target, EXECUTABLE_MODE)?;
        }
    }
    Ok(dest_dir.join(&staged.binary.name))
}

/// Remove a staging directory if present.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub fn clear_staging(fs: &impl LocalFs, staging: &Path) -> Result<()> {
    if fs.exists(staging) {
        fs.remove_dir_all(staging)?;
    }
    Ok(())
}
