//! Integration tests for argument parsing, help and version output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn qnode() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qnode"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    qnode().assert().code(2).stderr(predicate::str::contains(
        "Install and run a Quilibrium node as a systemd service",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let assert = qnode().arg("--help").assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    for cmd in ["install", "update", "configure", "snapshot", "service", "status", "config"] {
        assert!(out.contains(cmd), "help is missing '{cmd}':\n{out}");
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    qnode()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qnode"));
}

#[test]
fn test_version_command_shows_version() {
    qnode()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qnode 0.3.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let assert = qnode().args(["version", "--json"]).assert().success();
    let v: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(v["version"], "0.3.0");
}

#[test]
fn test_version_quiet_prints_nothing() {
    qnode()
        .args(["version", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_service_help_shows_actions() {
    qnode()
        .args(["service", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("restart"));
}

#[test]
fn test_update_check_conflicts_with_force() {
    qnode()
        .args(["update", "--check", "--force"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_command_fails() {
    qnode().arg("bogus").assert().code(2);
}
