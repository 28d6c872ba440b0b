//! Install record persisted between runs.
//!
//! Pure data only; persistence lives in `crate::infra::state`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::manifest::{Artifact, ReleaseVersion};
use crate::domain::platform::Platform;

/// What `qnode install` / `qnode update` last put on disk.
///
/// Stored at `~/.qnode/state.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallRecord {
    /// Filename of the node executable inside the node directory.
    pub node_binary: String,
    /// Version parsed from `node_binary`.
    pub node_version: String,
    /// Filename of the client executable, when one was installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_binary: Option<String>,
    pub platform: Platform,
    pub service_name: String,
    pub installed_at: DateTime<Utc>,
}

impl InstallRecord {
    /// Parsed node version; `None` for records written by hand.
    #[must_use]
    pub fn version(&self) -> Option<ReleaseVersion> {
        ReleaseVersion::parse(&self.node_version)
            .or_else(|| Artifact::new(self.node_binary.clone()).version().ok())
    }
}
