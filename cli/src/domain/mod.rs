//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod digest;
pub mod error;
pub mod install;
pub mod manifest;
pub mod node_config;
pub mod platform;
pub mod unit;

pub use config::{NodePaths, QnodeConfig, validate_config_key, validate_config_value};
pub use error::{
    ConfigError, DigestError, InstallError, ManifestError, NodeConfigError, PlatformError,
    SnapshotError, UnitError,
};
pub use install::InstallRecord;
pub use manifest::{Artifact, ArtifactKind, ReleaseManifest, ReleaseVersion};
pub use platform::Platform;
pub use unit::{ServiceState, ServiceUnit};
