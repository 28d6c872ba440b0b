//! Tests for `YamlConfigStore` and the config use-cases.
//!
//! Every test points `QNODE_CONFIG` at its own temp file, so they run serially.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use serial_test::serial;
use tempfile::TempDir;

use qnode_cli::application::ports::ConfigStore;
use qnode_cli::application::services::config_service::{load_config, set_value};
use qnode_cli::domain::config::QnodeConfig;
use qnode_cli::domain::error::ConfigError;
use qnode_cli::infra::config::{CONFIG_ENV, YamlConfigStore};

#[allow(unsafe_code)]
fn point_config_at(path: &Path) {
    // SAFETY: tests touching the environment are #[serial].
    unsafe { std::env::set_var(CONFIG_ENV, path) };
}

#[test]
#[serial]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    point_config_at(&dir.path().join("config.yaml"));

    let config = load_config(&YamlConfigStore).unwrap();

    assert_eq!(config, QnodeConfig::default());
}

#[test]
#[serial]
fn test_empty_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "\n").unwrap();
    point_config_at(&path);

    assert_eq!(YamlConfigStore.load().unwrap(), QnodeConfig::default());
}

#[test]
#[serial]
fn test_path_follows_env_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    point_config_at(&path);

    assert_eq!(YamlConfigStore.path().unwrap(), path);
}

#[test]
#[serial]
fn test_set_value_persists_and_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    point_config_at(&path);

    set_value(&YamlConfigStore, "node.max_frames", "5000").unwrap();
    set_value(&YamlConfigStore, "snapshot.url", "https://files.test/store.zip").unwrap();

    let reloaded = YamlConfigStore.load().unwrap();
    assert_eq!(reloaded.node.max_frames, 5000);
    assert_eq!(reloaded.snapshot.url.as_deref(), Some("https://files.test/store.zip"));
    assert_eq!(reloaded.service.name, QnodeConfig::default().service.name);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
#[serial]
fn test_set_unknown_key_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    point_config_at(&path);

    let err = set_value(&YamlConfigStore, "node.colour", "blue").unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownKey { .. })
    ));
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_set_invalid_value_is_rejected() {
    let dir = TempDir::new().unwrap();
    point_config_at(&dir.path().join("config.yaml"));

    let err = set_value(&YamlConfigStore, "release.include_client", "maybe").unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidValue { .. })
    ));
}

#[test]
#[serial]
fn test_malformed_yaml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "node: [unclosed").unwrap();
    point_config_at(&path);

    let err = YamlConfigStore.load().unwrap_err();

    assert!(err.to_string().contains("cannot parse"));
}
