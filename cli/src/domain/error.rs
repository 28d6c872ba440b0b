//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Platform errors ───────────────────────────────────────────────────────────

/// Errors raised while mapping the host to a release platform.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Unsupported platform: {os}-{arch}. Supported: linux/darwin on amd64/arm64.")]
    Unsupported { os: String, arch: String },

    #[error("Service installation requires systemd, which is not available on {0}.")]
    NoSystemd(String),
}

// ── Manifest errors ───────────────────────────────────────────────────────────

/// Errors raised while reading the release manifest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Release manifest lists no artifacts for {0}.")]
    NoArtifacts(String),

    #[error("Release manifest has no '{0}' executable for this platform.")]
    NoBinary(String),

    #[error("Release manifest lists more than one '{prefix}' executable: {found}")]
    Ambiguous { prefix: String, found: String },

    #[error("Cannot read a version from artifact name '{0}'.")]
    BadVersion(String),
}

// ── Digest errors ─────────────────────────────────────────────────────────────

/// Errors raised while verifying downloaded artifacts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("Digest file for {0} is empty or unreadable.")]
    Malformed(String),

    #[error("Digest algorithm '{0}' is not supported (expected SHA256 or SHA3-256).")]
    UnsupportedAlgorithm(String),

    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    Mismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

// ── Service unit errors ───────────────────────────────────────────────────────

/// Errors related to service unit generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("Invalid service name '{0}': use letters, digits, '_', '.', '@' or '-'.")]
    InvalidName(String),

    #[error("Service unit field {field} must be an absolute path, got '{value}'.")]
    RelativePath { field: &'static str, value: String },

    #[error("Service unit field {field} must not contain control characters.")]
    ControlCharacter { field: &'static str },
}

// ── Node config errors ────────────────────────────────────────────────────────

/// Errors related to the node's own YAML configuration.
#[derive(Debug, Error)]
pub enum NodeConfigError {
    #[error("Node config not found at {0}. Start the node once so it writes its config.")]
    NotFound(String),

    #[error("Node config did not appear at {path} within {secs}s.")]
    WaitTimedOut { path: String, secs: u64 },
}

// ── Installer config errors ───────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

// ── Install errors ────────────────────────────────────────────────────────────

/// Errors raised by the install and update pipelines.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Required tool '{0}' is not available. Install it and retry.")]
    MissingTool(String),

    #[error("Node is not installed. Run 'qnode install' first.")]
    NotInstalled,

    #[error("{command} failed with exit code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
}

// ── Snapshot errors ───────────────────────────────────────────────────────────

/// Errors raised while restoring a data snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("No snapshot URL configured. Pass --url or run: qnode config set snapshot.url <url>")]
    NoUrl,

    #[error("Snapshot archive format not recognized (expected zip or tar.gz): {0}")]
    UnknownFormat(String),

    #[error("Snapshot extracted but {0} is missing. The archive layout is not a node store.")]
    StoreMissing(String),

    #[error("Snapshot restore cancelled.")]
    Cancelled,
}
