//! Integration tests for `qnode config`.
//!
//! Every test sets `QNODE_CONFIG` to a temp path so none of them reads or
//! writes `~/.qnode/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qnode() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qnode"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_subcommands() {
    qnode()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_show_defaults() {
    let (_dir, path) = temp_config_path();
    qnode()
        .args(["config", "show"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("node.max_frames"))
        .stdout(predicate::str::contains("1001"))
        .stdout(predicate::str::contains("ceremonyclient"));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (_dir, path) = temp_config_path();
    qnode()
        .args(["config", "show"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .success();
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_path_prints_override() {
    let (_dir, path) = temp_config_path();
    qnode()
        .args(["config", "path"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    qnode()
        .args(["config", "set", "snapshot.url", "https://files.test/store.zip"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("snapshot.url"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("https://files.test/store.zip"));

    qnode()
        .args(["config", "show"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://files.test/store.zip"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    qnode()
        .args(["config", "set", "node.colour", "blue"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_value_fails() {
    let (_dir, path) = temp_config_path();
    qnode()
        .args(["config", "set", "node.max_frames", "lots"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for node.max_frames"));
}

#[test]
fn test_config_show_json() {
    let (_dir, path) = temp_config_path();
    let assert = qnode()
        .args(["config", "show", "--json"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .success();
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["config"]["node"]["max_frames"], 1001);
    assert_eq!(v["config"]["service"]["name"], "ceremonyclient");
    assert_eq!(v["path"], path.as_str());
}

#[test]
fn test_config_set_unknown_key_json_error() {
    let (_dir, path) = temp_config_path();
    let assert = qnode()
        .args(["config", "set", "node.colour", "blue", "--json"])
        .env("QNODE_CONFIG", &path)
        .assert()
        .code(1);
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["code"], "CONFIG");
}
