//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`; never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{InstallRecord, QnodeConfig, ServiceState, ServiceUnit};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Whether long-running steps should draw spinners and bars.
    fn show_progress(&self) -> bool {
        false
    }
    /// Begin a wait of unknown length (a spinner on terminals).
    fn wait_started(&self, message: &str) {
        self.step(message);
    }
    /// End the wait begun by `wait_started`.
    fn wait_finished(&self, ok: bool, message: &str) {
        if ok {
            self.success(message);
        } else {
            self.warn(message);
        }
    }
}

// ── Release Port ──────────────────────────────────────────────────────────────

/// HTTP access to the release listing, artifact host, and snapshot host.
///
/// Blocking; the underlying client is synchronous.
pub trait ReleaseClient {
    /// GET `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    fn fetch_text(&self, url: &str) -> Result<String>;

    /// GET `url` into `dest`, writing through `<dest>.partial` and renaming on
    /// success. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a write error.
    fn download(&self, url: &str, dest: &Path, show_progress: bool) -> Result<u64>;
}

// ── Service Manager Port ──────────────────────────────────────────────────────

/// The OS service manager (systemd on Linux).
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Write the unit file into the unit directory, returning its path.
    async fn install_unit(&self, unit: &ServiceUnit) -> Result<PathBuf>;
    /// Whether a unit file for `name` is present.
    fn unit_installed(&self, name: &str) -> bool;
    async fn daemon_reload(&self) -> Result<()>;
    async fn enable(&self, name: &str) -> Result<()>;
    async fn disable(&self, name: &str) -> Result<()>;
    async fn start(&self, name: &str) -> Result<()>;
    /// Stop the unit. Returns once the stop command has exited.
    async fn stop(&self, name: &str) -> Result<()>;
    async fn restart(&self, name: &str) -> Result<()>;
    /// Current state; never fails for an unknown unit (reports `Inactive`/`Unknown`).
    async fn state(&self, name: &str) -> Result<ServiceState>;
}

// ── Source Port ───────────────────────────────────────────────────────────────

/// Keeps a local clone of the node source tree current.
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    /// Clone `repo_url` at `branch` into `dest`, or fast-forward an existing clone.
    async fn sync(&self, repo_url: &str, branch: &str, dest: &Path) -> Result<()>;
}

// ── Archive Port ──────────────────────────────────────────────────────────────

/// Unpacks a snapshot archive.
pub trait ArchiveExtractor {
    /// Extract `archive` into `dest`, returning the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown formats, unsafe entry paths, or I/O failures.
    fn extract(&self, archive: &Path, dest: &Path, show_progress: bool) -> Result<u64>;
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Raw filesystem operations used by application services.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    /// Write atomically (temp file + rename).
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

/// Abstracts file hashing operations.
pub trait FileHasher {
    /// Compute the SHA-256 hash of a file.
    fn sha256_file(&self, path: &Path) -> Result<String>;
    /// Compute the SHA3-256 hash of a file.
    fn sha3_256_file(&self, path: &Path) -> Result<String>;
}

// ── State Ports ───────────────────────────────────────────────────────────────

/// Abstracts installer configuration persistence.
pub trait ConfigStore {
    /// Load config, returning defaults if the file does not exist.
    fn load(&self) -> Result<QnodeConfig>;
    fn save(&self, config: &QnodeConfig) -> Result<()>;
    /// Path of the config file.
    fn path(&self) -> Result<PathBuf>;
}

/// Abstracts install record persistence (load/save).
#[allow(async_fn_in_trait)]
pub trait InstallRecordStore {
    /// Load the current record, returning `None` if nothing is installed.
    async fn load_async(&self) -> Result<Option<InstallRecord>>;
    /// Persist the given record.
    async fn save_async(&self, record: &InstallRecord) -> Result<()>;
}
