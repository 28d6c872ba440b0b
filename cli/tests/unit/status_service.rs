//! Tests for `collect_status`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use qnode_cli::application::services::status::collect_status;
use qnode_cli::domain::node_config::PatchOutcome;
use qnode_cli::domain::platform::{Arch, Os, Platform};
use qnode_cli::domain::unit::ServiceState;

use crate::mocks::{Env, FRESH_NODE_CONFIG, SERVICE, linux_amd64};

#[tokio::test]
async fn test_status_on_fresh_host() {
    let env = Env::new(ServiceState::Inactive);

    let report = collect_status(
        &env.records,
        &env.services,
        &env.fs,
        &env.config,
        &env.paths,
        linux_amd64(),
    )
    .await;

    assert!(report.installed.is_none());
    assert_eq!(report.service_name, SERVICE);
    assert!(!report.unit_installed);
    assert_eq!(report.service, ServiceState::Inactive);
    assert!(report.node_config.is_none());
    assert!(report.snapshot_url.is_none());
}

#[tokio::test]
async fn test_status_reports_install_and_config_keys() {
    let mut env = Env::new(ServiceState::Active);
    env.preinstall("2.0.6.1");
    env.config.snapshot.url = Some("https://files.test/store.zip".into());
    std::fs::create_dir_all(&env.paths.config_dir).unwrap();
    std::fs::write(
        &env.paths.node_config,
        FRESH_NODE_CONFIG.replace("maxFrames: -1", "maxFrames: 1001"),
    )
    .unwrap();

    let report = collect_status(
        &env.records,
        &env.services,
        &env.fs,
        &env.config,
        &env.paths,
        linux_amd64(),
    )
    .await;

    assert_eq!(report.installed.unwrap().node_version, "2.0.6.1");
    assert_eq!(report.service, ServiceState::Active);
    let keys = report.node_config.expect("node config present");
    assert_eq!(keys.len(), 3);
    assert_eq!(keys[0].key, "maxFrames");
    assert_eq!(keys[0].state, PatchOutcome::AlreadySet);
    assert_eq!(keys[1].state, PatchOutcome::Patched, "placeholder still present");
    assert_eq!(report.snapshot_url.as_deref(), Some("https://files.test/store.zip"));
}

#[tokio::test]
async fn test_status_on_darwin_skips_systemd() {
    let env = Env::new(ServiceState::Active);
    let darwin = Platform {
        os: Os::Darwin,
        arch: Arch::Arm64,
    };

    let report = collect_status(
        &env.records,
        &env.services,
        &env.fs,
        &env.config,
        &env.paths,
        darwin,
    )
    .await;

    assert!(matches!(report.service, ServiceState::Unknown(_)));
    assert!(!report.unit_installed);
}

#[tokio::test]
async fn test_status_serializes_to_json() {
    let env = Env::new(ServiceState::Failed);

    let report = collect_status(
        &env.records,
        &env.services,
        &env.fs,
        &env.config,
        &env.paths,
        linux_amd64(),
    )
    .await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["service_name"], SERVICE);
    assert!(json["installed"].is_null());
    assert!(json["paths"]["store_dir"].as_str().unwrap().ends_with("store"));
}
