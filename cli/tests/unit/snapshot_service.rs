//! Tests for snapshot URL resolution and `restore_snapshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use qnode_cli::application::services::snapshot::{archive_name, resolve_url, restore_snapshot};
use qnode_cli::domain::config::QnodeConfig;
use qnode_cli::domain::error::SnapshotError;
use qnode_cli::domain::unit::ServiceState;
use qnode_cli::infra::archive::FsArchiveExtractor;

use crate::mocks::{Env, SERVICE};

const SNAPSHOT_URL: &str = "https://files.test/snapshots/store.tar.gz?dl=1";

fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
    let mut builder = tar::Builder::new(enc);
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

async fn restore(env: &Env, download_dir: &Path) -> anyhow::Result<u64> {
    restore_snapshot(
        &env.release,
        &FsArchiveExtractor,
        &env.fs,
        &env.services,
        &env.reporter,
        SNAPSHOT_URL,
        &env.paths,
        SERVICE,
        download_dir,
    )
    .await
    .map(|o| o.entries)
}

#[test]
fn test_resolve_url_prefers_flag() {
    let mut config = QnodeConfig::default();
    config.snapshot.url = Some("https://config.test/a.zip".into());
    assert_eq!(
        resolve_url(Some("https://flag.test/b.zip"), &config).unwrap(),
        "https://flag.test/b.zip"
    );
    assert_eq!(resolve_url(None, &config).unwrap(), "https://config.test/a.zip");
}

#[test]
fn test_resolve_url_without_any_source_is_no_url() {
    let err = resolve_url(None, &QnodeConfig::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SnapshotError>(),
        Some(SnapshotError::NoUrl)
    ));
    assert!(resolve_url(Some("  "), &QnodeConfig::default()).is_err());
}

#[test]
fn test_archive_name_strips_query_and_falls_back() {
    assert_eq!(archive_name(SNAPSHOT_URL), "store.tar.gz");
    assert_eq!(archive_name("https://files.test/dl/"), "snapshot.archive");
}

#[tokio::test]
async fn test_restore_replaces_store_and_restarts_service() {
    let mut env = Env::new(ServiceState::Active);
    env.release.serve(
        SNAPSHOT_URL,
        tar_gz(&[("store/CURRENT", b"MANIFEST-000010"), ("store/000010.sst", b"sst")]),
    );
    std::fs::create_dir_all(&env.paths.store_dir).unwrap();
    std::fs::write(env.paths.store_dir.join("stale.sst"), b"old").unwrap();
    env.services.watch = vec![env.paths.store_dir.join("stale.sst")];
    let download = tempfile::tempdir().unwrap();

    let entries = restore(&env, download.path()).await.expect("restore");

    assert_eq!(entries, 2);
    assert_eq!(
        env.services.events(),
        [format!("stop {SERVICE}"), format!("start {SERVICE}")]
    );
    assert_eq!(
        *env.services.seen_at_stop.borrow(),
        [true],
        "old store must still exist while the service runs"
    );
    assert!(!env.paths.store_dir.join("stale.sst").exists());
    assert_eq!(
        std::fs::read_to_string(env.paths.store_dir.join("CURRENT")).unwrap(),
        "MANIFEST-000010"
    );
    assert!(download.path().join("store.tar.gz").exists());
}

#[tokio::test]
async fn test_restore_without_store_dir_in_archive_fails() {
    let mut env = Env::new(ServiceState::Active);
    env.release
        .serve(SNAPSHOT_URL, tar_gz(&[("data/CURRENT", b"x")]));
    let download = tempfile::tempdir().unwrap();

    let err = restore(&env, download.path()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SnapshotError>(),
        Some(SnapshotError::StoreMissing(_))
    ));
    // No restart on failure; the node stays stopped.
    assert_eq!(env.services.events(), [format!("stop {SERVICE}")]);
}

#[tokio::test]
async fn test_restore_download_failure_leaves_store_alone() {
    let env = Env::new(ServiceState::Active);
    std::fs::create_dir_all(&env.paths.store_dir).unwrap();
    std::fs::write(env.paths.store_dir.join("CURRENT"), b"keep").unwrap();
    let download = tempfile::tempdir().unwrap();

    let err = restore(&env, download.path()).await.unwrap_err();

    assert!(format!("{err:#}").contains("HTTP 404"));
    assert!(env.services.events().is_empty());
    assert!(env.paths.store_dir.join("CURRENT").exists());
}

#[tokio::test]
async fn test_restore_does_not_start_a_service_that_was_never_installed() {
    let mut env = Env::new(ServiceState::Inactive);
    env.release
        .serve(SNAPSHOT_URL, tar_gz(&[("store/CURRENT", b"x")]));
    let download = tempfile::tempdir().unwrap();

    restore(&env, download.path()).await.expect("restore");

    assert!(env.services.events().is_empty());
}
