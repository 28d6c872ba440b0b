//! Tests for node config patching and `configure_node`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use qnode_cli::application::services::node_config::{
    configure_node, node_config_state, patch_node_config, wait_for_config,
};
use qnode_cli::domain::error::NodeConfigError;
use qnode_cli::domain::node_config::PatchOutcome;
use qnode_cli::domain::unit::ServiceState;

use crate::mocks::{Env, FRESH_NODE_CONFIG, SERVICE};

fn write_node_config(env: &Env, text: &str) {
    std::fs::create_dir_all(&env.paths.config_dir).unwrap();
    std::fs::write(&env.paths.node_config, text).unwrap();
}

#[test]
fn test_patch_missing_file_is_not_found() {
    let env = Env::new(ServiceState::Inactive);

    let err = patch_node_config(
        &env.fs,
        &env.reporter,
        &env.paths.node_config,
        &env.config.node.settings(),
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<NodeConfigError>(),
        Some(NodeConfigError::NotFound(_))
    ));
}

#[test]
fn test_patch_rewrites_placeholders_and_keeps_the_rest() {
    let env = Env::new(ServiceState::Inactive);
    write_node_config(&env, FRESH_NODE_CONFIG);

    let report = patch_node_config(
        &env.fs,
        &env.reporter,
        &env.paths.node_config,
        &env.config.node.settings(),
    )
    .expect("patch");

    assert!(report.is_changed());
    let text = std::fs::read_to_string(&env.paths.node_config).unwrap();
    assert_eq!(text, report.text);
    assert!(text.contains("keyManagerType: file"));
    assert!(text.contains("listenMultiaddr: /ip4/0.0.0.0/udp/8336/quic"));
    assert!(!text.contains("maxFrames: -1"));
}

#[test]
fn test_patch_warns_for_keys_it_cannot_find() {
    let env = Env::new(ServiceState::Inactive);
    write_node_config(&env, "engine:\n  maxFrames: -1\n");

    let report = patch_node_config(
        &env.fs,
        &env.reporter,
        &env.paths.node_config,
        &env.config.node.settings(),
    )
    .expect("patch");

    assert_eq!(report.missing(), ["listenGrpcMultiaddr", "listenRESTMultiaddr"]);
    assert_eq!(env.reporter.warnings().len(), 2);
}

#[test]
fn test_state_is_none_before_node_writes_config() {
    let env = Env::new(ServiceState::Inactive);
    let state =
        node_config_state(&env.fs, &env.paths.node_config, &env.config.node.settings()).unwrap();
    assert!(state.is_none());
}

#[test]
fn test_state_does_not_modify_file() {
    let env = Env::new(ServiceState::Inactive);
    write_node_config(&env, FRESH_NODE_CONFIG);

    let state = node_config_state(&env.fs, &env.paths.node_config, &env.config.node.settings())
        .unwrap()
        .expect("config present");

    assert!(state.iter().all(|(_, o)| *o == PatchOutcome::Patched));
    assert_eq!(
        std::fs::read_to_string(&env.paths.node_config).unwrap(),
        FRESH_NODE_CONFIG
    );
}

#[tokio::test]
async fn test_configure_restarts_when_changed() {
    let env = Env::new(ServiceState::Active);
    write_node_config(&env, FRESH_NODE_CONFIG);

    let (report, restarted) = configure_node(
        &env.fs,
        &env.services,
        &env.reporter,
        &env.paths.node_config,
        &env.config.node.settings(),
        SERVICE,
        true,
    )
    .await
    .expect("configure");

    assert!(report.is_changed());
    assert!(restarted);
    assert_eq!(env.services.events(), [format!("restart {SERVICE}")]);
}

#[tokio::test]
async fn test_configure_second_run_is_a_no_op() {
    let env = Env::new(ServiceState::Active);
    write_node_config(&env, FRESH_NODE_CONFIG);
    let settings = env.config.node.settings();
    configure_node(
        &env.fs, &env.services, &env.reporter, &env.paths.node_config, &settings, SERVICE, true,
    )
    .await
    .unwrap();
    let first = std::fs::read_to_string(&env.paths.node_config).unwrap();

    let (report, restarted) = configure_node(
        &env.fs, &env.services, &env.reporter, &env.paths.node_config, &settings, SERVICE, true,
    )
    .await
    .unwrap();

    assert!(!report.is_changed());
    assert!(!restarted);
    assert_eq!(std::fs::read_to_string(&env.paths.node_config).unwrap(), first);
    assert_eq!(env.services.events().len(), 1, "only the first run restarts");
}

#[tokio::test]
async fn test_configure_without_restart_only_warns() {
    let env = Env::new(ServiceState::Active);
    write_node_config(&env, FRESH_NODE_CONFIG);

    let (_, restarted) = configure_node(
        &env.fs,
        &env.services,
        &env.reporter,
        &env.paths.node_config,
        &env.config.node.settings(),
        SERVICE,
        false,
    )
    .await
    .unwrap();

    assert!(!restarted);
    assert!(env.services.events().is_empty());
    assert!(env.reporter.warnings().iter().any(|w| w.contains("Restart")));
}

#[tokio::test]
async fn test_wait_returns_once_file_exists() {
    let env = Env::new(ServiceState::Inactive);
    write_node_config(&env, FRESH_NODE_CONFIG);

    wait_for_config(
        &env.fs,
        &env.paths.node_config,
        Duration::from_millis(10),
        Duration::from_millis(1),
    )
    .await
    .expect("present");
}

#[tokio::test]
async fn test_wait_times_out_with_path_in_error() {
    let env = Env::new(ServiceState::Inactive);

    let err = wait_for_config(
        &env.fs,
        &env.paths.node_config,
        Duration::from_millis(20),
        Duration::from_millis(5),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("config.yml"));
}
