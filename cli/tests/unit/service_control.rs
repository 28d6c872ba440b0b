//! Tests for unit naming and (re)installation in `services::service`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use qnode_cli::application::services::service::{active_name, install_service, stop_for_replace};
use qnode_cli::domain::error::InstallError;
use qnode_cli::domain::unit::ServiceState;

use crate::mocks::{Env, SERVICE, node_name};

#[tokio::test]
async fn test_active_name_prefers_install_record() {
    let mut env = Env::new(ServiceState::Active);
    assert_eq!(active_name(&env.records, &env.config.service).await.unwrap(), SERVICE);

    env.preinstall("2.0.6.1");
    env.config.service.name = "quil-renamed".into();

    assert_eq!(active_name(&env.records, &env.config.service).await.unwrap(), SERVICE);
}

#[tokio::test]
async fn test_stop_for_replace_same_name_only_stops() {
    let env = Env::new(ServiceState::Active);

    let was_running = stop_for_replace(&env.services, &env.reporter, Some(SERVICE), SERVICE)
        .await
        .unwrap();

    assert!(was_running);
    assert_eq!(env.services.events(), [format!("stop {SERVICE}")]);
}

#[tokio::test]
async fn test_stop_for_replace_fresh_host_touches_nothing() {
    let env = Env::new(ServiceState::Inactive);

    let was_running = stop_for_replace(&env.services, &env.reporter, None, SERVICE)
        .await
        .unwrap();

    assert!(!was_running);
    assert!(env.services.events().is_empty());
}

#[tokio::test]
async fn test_install_service_requires_install_record() {
    let env = Env::new(ServiceState::Inactive);

    let err = install_service(
        &env.services,
        &env.records,
        &env.fs,
        &env.reporter,
        &env.config.service,
        &env.paths,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InstallError>(),
        Some(InstallError::NotInstalled)
    ));
    assert!(env.services.events().is_empty());
}

#[tokio::test]
async fn test_install_service_after_rename_disables_old_unit() {
    let mut env = Env::new(ServiceState::Active);
    env.preinstall("2.0.6.1");
    env.config.service.name = "quil-renamed".into();

    let unit = install_service(
        &env.services,
        &env.records,
        &env.fs,
        &env.reporter,
        &env.config.service,
        &env.paths,
    )
    .await
    .expect("install service");

    assert_eq!(unit.name, "quil-renamed");
    assert_eq!(
        unit.exec_start,
        env.paths.node_dir.join(node_name("2.0.6.1")).to_string_lossy()
    );
    assert_eq!(
        env.services.events()[..2],
        [format!("stop {SERVICE}"), format!("disable {SERVICE}")]
    );
    let record = env.records.record.borrow().clone().expect("record");
    assert_eq!(record.service_name, "quil-renamed");
}
