//! Integration tests for node commands that fail before touching the host.
//!
//! `HOME` and `QNODE_CONFIG` point into a temp dir so there is no install
//! record and no snapshot URL.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qnode(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qnode"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env("QNODE_CONFIG", home.path().join("config.yaml"));
    cmd
}

#[test]
fn test_snapshot_without_url_explains_how_to_set_one() {
    let home = TempDir::new().unwrap();
    qnode(&home)
        .args(["snapshot", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No snapshot URL configured"))
        .stderr(predicate::str::contains("qnode config set snapshot.url"));
}

#[test]
fn test_snapshot_without_url_json_error_code() {
    let home = TempDir::new().unwrap();
    let assert = qnode(&home)
        .args(["snapshot", "--yes", "--json"])
        .assert()
        .code(1);
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "SNAPSHOT");
}

#[cfg(target_os = "linux")]
#[test]
fn test_update_check_without_install_reports_not_installed() {
    let home = TempDir::new().unwrap();
    qnode(&home)
        .args(["update", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Node is not installed"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_service_install_without_install_record_fails() {
    let home = TempDir::new().unwrap();
    let units = home.path().join("units");
    qnode(&home)
        .args(["config", "set", "service.unit_dir"])
        .arg(&units)
        .assert()
        .success();

    qnode(&home)
        .args(["service", "install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Node is not installed"));
    assert!(!units.exists());
}

#[test]
fn test_configure_before_first_start_reports_missing_node_config() {
    let home = TempDir::new().unwrap();
    qnode(&home)
        .arg("configure")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Node config not found"));
}
