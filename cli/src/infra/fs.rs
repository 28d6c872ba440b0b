//! Filesystem infrastructure: implements `LocalFs` and `FileHasher`.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use sha3::Sha3_256;

use crate::application::ports::{FileHasher, LocalFs};
use crate::domain::digest::hex_encode;

/// Production filesystem.
pub struct StdFs;

impl LocalFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::rename(from, to)
            .with_context(|| format!("moving {} to {}", from.display(), to.display()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let tmp = {
            let mut s = path.as_os_str().to_owned();
            s.push(".tmp");
            std::path::PathBuf::from(s)
        };
        std::fs::write(&tmp, content).with_context(|| format!("writing {}", tmp.display()))?;
        // Keep the original file's mode; the node config is private to its user.
        #[cfg(unix)]
        if let Ok(meta) = std::fs::metadata(path) {
            std::fs::set_permissions(&tmp, meta.permissions())
                .with_context(|| format!("setting permissions on {}", tmp.display()))?;
        }
        std::fs::rename(&tmp, path).with_context(|| format!("writing file {}", path.display()))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading file {}", path.display()))
    }

    #[cfg_attr(not(unix), allow(unused_variables))]
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("setting permissions on {}", path.display()))?;
        }
        Ok(())
    }
}

impl FileHasher for StdFs {
    fn sha256_file(&self, path: &Path) -> Result<String> {
        hash_file::<Sha256>(path)
    }

    fn sha3_256_file(&self, path: &Path) -> Result<String> {
        hash_file::<Sha3_256>(path)
    }
}

/// Hex digest of a file, read in 64 KiB chunks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn hash_file<D: Digest>(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; 65536];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex_encode(&hasher.finalize()))
}
