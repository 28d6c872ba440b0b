//! Application service: node status gathering use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use serde::Serialize;

use crate::application::ports::{InstallRecordStore, LocalFs, ServiceManager};
use crate::application::services::node_config::node_config_state;
use crate::domain::config::{NodePaths, QnodeConfig};
use crate::domain::install::InstallRecord;
use crate::domain::node_config::PatchOutcome;
use crate::domain::platform::Platform;
use crate::domain::unit::ServiceState;

/// One node config key and whether it carries the configured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigKeyStatus {
    pub key: &'static str,
    pub state: PatchOutcome,
}

/// Everything `qnode status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub platform: Platform,
    pub installed: Option<InstallRecord>,
    pub service_name: String,
    pub unit_installed: bool,
    pub service: ServiceState,
    /// `None` until the node has written its config.
    pub node_config: Option<Vec<ConfigKeyStatus>>,
    pub snapshot_url: Option<String>,
    pub paths: NodePaths,
}

/// Gather status from the install record, systemd, and the node config.
///
/// Infallible: a failing probe is logged and reported as unknown or absent.
pub async fn collect_status(
    records: &impl InstallRecordStore,
    svc: &impl ServiceManager,
    fs: &impl LocalFs,
    config: &QnodeConfig,
    paths: &NodePaths,
    platform: Platform,
) -> StatusReport {
    let installed = records.load_async().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read install record");
        None
    });
    let service_name = installed
        .as_ref()
        .map_or_else(|| config.service.name.clone(), |r| r.service_name.clone());

    let (unit_installed, service) = if platform.supports_systemd() {
        let state = svc.state(&service_name).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not query service state");
            ServiceState::Unknown("error".to_string())
        });
        (svc.unit_installed(&service_name), state)
    } else {
        (false, ServiceState::Unknown("no systemd".to_string()))
    };

    let node_config = node_config_state(fs, &paths.node_config, &config.node.settings())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read node config");
            None
        })
        .map(|keys| {
            keys.into_iter()
                .map(|(key, state)| ConfigKeyStatus { key, state })
                .collect()
        });

    StatusReport {
        platform,
        installed,
        service_name,
        unit_installed,
        service,
        node_config,
        snapshot_url: config.snapshot.url.clone(),
        paths: paths.clone(),
    }
}
