//! Domain types and validators for qnode configuration.
//!
//! Pure functions only; no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::node_config::NodeSettings;
use crate::domain::unit::{DEFAULT_DESCRIPTION, has_control_chars, validate_service_name};

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_REPO_URL: &str = "https://github.com/QuilibriumNetwork/ceremonyclient.git";
pub const DEFAULT_BRANCH: &str = "release";
pub const DEFAULT_INSTALL_DIR_NAME: &str = "ceremonyclient";
pub const DEFAULT_MANIFEST_URL: &str = "https://releases.quilibrium.com/release";
pub const DEFAULT_ARTIFACT_BASE_URL: &str = "https://releases.quilibrium.com";
pub const DEFAULT_CLIENT_MANIFEST_URL: &str = "https://releases.quilibrium.com/qclient-release";
pub const DEFAULT_SERVICE_NAME: &str = "ceremonyclient";
pub const DEFAULT_UNIT_DIR: &str = "/lib/systemd/system";
pub const DEFAULT_MAX_FRAMES: i64 = 1001;
pub const DEFAULT_GRPC_MULTIADDR: &str = "/ip4/127.0.0.1/tcp/8337";
pub const DEFAULT_REST_MULTIADDR: &str = "/ip4/127.0.0.1/tcp/8338";
pub const DEFAULT_CONFIG_WAIT_SECS: u64 = 300;

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "source.repo_url",
    "source.branch",
    "source.install_dir",
    "release.manifest_url",
    "release.artifact_base_url",
    "release.client_manifest_url",
    "release.include_client",
    "service.name",
    "service.description",
    "service.unit_dir",
    "service.user",
    "node.max_frames",
    "node.listen_grpc_multiaddr",
    "node.listen_rest_multiaddr",
    "node.config_wait_secs",
    "snapshot.url",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.qnode/config.yaml`.
///
/// Every field has a default, so a missing file reproduces the fixed
/// behaviour of a plain install.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct QnodeConfig {
    pub source: SourceConfig,
    pub release: ReleaseConfig,
    pub service: ServiceConfig,
    pub node: NodeConfig,
    pub snapshot: SnapshotConfig,
}

/// Where the node source tree comes from and where it lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    pub repo_url: String,
    pub branch: String,
    /// Defaults to `~/ceremonyclient` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            install_dir: None,
        }
    }
}

/// Release listing and artifact host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReleaseConfig {
    pub manifest_url: String,
    pub artifact_base_url: String,
    pub client_manifest_url: String,
    pub include_client: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            artifact_base_url: DEFAULT_ARTIFACT_BASE_URL.to_string(),
            client_manifest_url: DEFAULT_CLIENT_MANIFEST_URL.to_string(),
            include_client: true,
        }
    }
}

/// systemd unit settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub description: String,
    pub unit_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            unit_dir: PathBuf::from(DEFAULT_UNIT_DIR),
            user: None,
        }
    }
}

/// Values patched into the node's own config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NodeConfig {
    pub max_frames: i64,
    pub listen_grpc_multiaddr: String,
    pub listen_rest_multiaddr: String,
    /// How long to wait for the node to write its config after first start.
    pub config_wait_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            listen_grpc_multiaddr: DEFAULT_GRPC_MULTIADDR.to_string(),
            listen_rest_multiaddr: DEFAULT_REST_MULTIADDR.to_string(),
            config_wait_secs: DEFAULT_CONFIG_WAIT_SECS,
        }
    }
}

impl NodeConfig {
    #[must_use]
    pub fn settings(&self) -> NodeSettings {
        NodeSettings {
            max_frames: self.max_frames,
            listen_grpc_multiaddr: self.listen_grpc_multiaddr.clone(),
            listen_rest_multiaddr: self.listen_rest_multiaddr.clone(),
        }
    }
}

/// Data snapshot source. There is no default host.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SnapshotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ── Derived paths ────────────────────────────────────────────────────────────

/// Filesystem layout of an installed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePaths {
    pub install_dir: PathBuf,
    pub node_dir: PathBuf,
    pub client_dir: PathBuf,
    pub config_dir: PathBuf,
    pub node_config: PathBuf,
    pub store_dir: PathBuf,
    pub staging_dir: PathBuf,
}

impl QnodeConfig {
    /// Resolve the install layout relative to `home`.
    #[must_use]
    pub fn paths(&self, home: &Path) -> NodePaths {
        let install_dir = self
            .source
            .install_dir
            .clone()
            .unwrap_or_else(|| home.join(DEFAULT_INSTALL_DIR_NAME));
        NodePaths::new(install_dir)
    }
}

impl NodePaths {
    #[must_use]
    pub fn new(install_dir: PathBuf) -> Self {
        let node_dir = install_dir.join("node");
        let config_dir = node_dir.join(".config");
        Self {
            client_dir: install_dir.join("client"),
            node_config: config_dir.join("config.yml"),
            store_dir: config_dir.join("store"),
            staging_dir: node_dir.join(".qnode-staging"),
            config_dir,
            node_dir,
            install_dir,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |expected: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
        .into()
    };
    match key {
        "source.repo_url"
        | "release.manifest_url"
        | "release.artifact_base_url"
        | "release.client_manifest_url"
        | "snapshot.url" => {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(invalid("an http:// or https:// URL"));
            }
        }
        "release.include_client" => {
            if value.parse::<bool>().is_err() {
                return Err(invalid("true or false"));
            }
        }
        "node.max_frames" => {
            if value.parse::<i64>().is_err() {
                return Err(invalid("an integer (-1 for unlimited)"));
            }
        }
        "node.config_wait_secs" => {
            if value.parse::<u64>().is_err() {
                return Err(invalid("a non-negative number of seconds"));
            }
        }
        "node.listen_grpc_multiaddr" | "node.listen_rest_multiaddr" => {
            if !value.starts_with('/') {
                return Err(invalid("a multiaddr such as /ip4/127.0.0.1/tcp/8337"));
            }
        }
        "service.name" => {
            if validate_service_name(value).is_err() {
                return Err(invalid("letters, digits, '_', '.', '@' or '-'"));
            }
        }
        "service.description" | "service.user" => {
            if has_control_chars(value) {
                return Err(invalid("a single line of text"));
            }
        }
        "source.install_dir" | "service.unit_dir" => {
            if !value.starts_with('/') {
                return Err(invalid("an absolute path"));
            }
        }
        "source.branch" => {
            if value.is_empty() || value.starts_with('-') {
                return Err(invalid("a branch name"));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Assign a validated value to `config`.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value invalid.
pub fn set_config_value(config: &mut QnodeConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let owned = value.to_string();
    match key {
        "source.repo_url" => config.source.repo_url = owned,
        "source.branch" => config.source.branch = owned,
        "source.install_dir" => config.source.install_dir = Some(PathBuf::from(owned)),
        "release.manifest_url" => config.release.manifest_url = owned,
        "release.artifact_base_url" => config.release.artifact_base_url = owned,
        "release.client_manifest_url" => config.release.client_manifest_url = owned,
        "release.include_client" => config.release.include_client = value.parse()?,
        "service.name" => config.service.name = owned,
        "service.description" => config.service.description = owned,
        "service.unit_dir" => config.service.unit_dir = PathBuf::from(owned),
        "service.user" => config.service.user = Some(owned).filter(|u| !u.is_empty()),
        "node.max_frames" => config.node.max_frames = value.parse()?,
        "node.listen_grpc_multiaddr" => config.node.listen_grpc_multiaddr = owned,
        "node.listen_rest_multiaddr" => config.node.listen_rest_multiaddr = owned,
        "node.config_wait_secs" => config.node.config_wait_secs = value.parse()?,
        "snapshot.url" => config.snapshot.url = Some(owned),
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
