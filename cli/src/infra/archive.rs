//! Snapshot archive extraction: implements `ArchiveExtractor`.
//!
//! The format is sniffed from the first bytes, not the file name: zip
//! (`PK\x03\x04`) or gzip-compressed tar (`\x1f\x8b`).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::application::ports::ArchiveExtractor;
use crate::domain::error::SnapshotError;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

/// Identify the archive format from its leading bytes.
///
/// # Errors
///
/// Returns `SnapshotError::UnknownFormat` for anything else.
pub fn sniff_format(path: &Path) -> Result<ArchiveFormat> {
    let mut head = [0u8; 4];
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let n = file
        .read(&mut head)
        .with_context(|| format!("reading {}", path.display()))?;
    if n >= 4 && head == ZIP_MAGIC {
        Ok(ArchiveFormat::Zip)
    } else if n >= 2 && head[..2] == GZIP_MAGIC {
        Ok(ArchiveFormat::TarGz)
    } else {
        Err(SnapshotError::UnknownFormat(path.display().to_string()).into())
    }
}

/// Production extractor.
pub struct FsArchiveExtractor;

impl ArchiveExtractor for FsArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path, show_progress: bool) -> Result<u64> {
        std::fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;
        let format = sniff_format(archive)?;
        tracing::debug!(archive = %archive.display(), ?format, "extracting");
        match format {
            ArchiveFormat::Zip => extract_zip(archive, dest, show_progress),
            ArchiveFormat::TarGz => extract_tar_gz(archive, dest, show_progress),
        }
    }
}

fn extract_zip(archive: &Path, dest: &Path, show_progress: bool) -> Result<u64> {
    let file = File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file)).context("reading zip archive")?;
    let pb = entry_bar(show_progress, Some(zip.len() as u64));
    let mut written = 0u64;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).context("reading zip entry")?;
        let Some(rel) = entry.enclosed_name() else {
            anyhow::bail!("zip entry '{}' escapes the destination", entry.name());
        };
        let out = dest.join(rel);
        if entry.is_dir() {
            std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
        } else {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let mut f = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
            std::io::copy(&mut entry, &mut f)
                .with_context(|| format!("extracting {}", out.display()))?;
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode & 0o7777))
                    .with_context(|| format!("setting permissions on {}", out.display()))?;
            }
        }
        written += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(written)
}

fn extract_tar_gz(archive: &Path, dest: &Path, show_progress: bool) -> Result<u64> {
    let file = File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
    let len = file.metadata().map(|m| m.len()).ok();
    // Progress tracks compressed bytes consumed; entry count is unknown up front.
    let pb = byte_bar(show_progress, len);
    let reader = pb.wrap_read(BufReader::new(file));
    let mut tar = tar::Archive::new(GzDecoder::new(reader));
    tar.set_preserve_permissions(true);

    let mut written = 0u64;
    for entry in tar.entries().context("reading tar archive")? {
        let mut entry = entry.context("reading tar entry")?;
        // unpack_in refuses paths that would land outside `dest`.
        let unpacked = entry
            .unpack_in(dest)
            .with_context(|| format!("extracting into {}", dest.display()))?;
        if !unpacked {
            let name = entry.path().map(|p| p.display().to_string()).unwrap_or_default();
            anyhow::bail!("tar entry '{name}' escapes the destination");
        }
        written += 1;
    }
    pb.finish_and_clear();
    Ok(written)
}

fn entry_bar(show: bool, total: Option<u64>) -> indicatif::ProgressBar {
    bar_with(show, total, "  Extracting {bar:40.cyan/dim} {pos}/{len} files")
}

fn byte_bar(show: bool, total: Option<u64>) -> indicatif::ProgressBar {
    bar_with(show, total, "  Extracting {bar:40.cyan/dim} {percent}%  {bytes}/{total_bytes}")
}

fn bar_with(show: bool, total: Option<u64>, template: &str) -> indicatif::ProgressBar {
    if !show {
        return indicatif::ProgressBar::hidden();
    }
    let Some(t) = total else {
        return indicatif::ProgressBar::new_spinner();
    };
    let pb = indicatif::ProgressBar::new(t);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("━━─"),
    );
    pb
}
