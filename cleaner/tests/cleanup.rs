//! Filesystem tests for the data cleaner

use std::fs;
use std::path::{Path, PathBuf};

use cleaner::{CleanerError, CleanupOutcome, DataCleaner};
use tempfile::TempDir;

fn make_dir_with_wal(base: &Path, name: &str) -> PathBuf {
    let dir = base.join(name);
    fs::create_dir_all(dir.join("wal")).unwrap();
    fs::write(dir.join("wal").join("000001.log"), b"put k v\n").unwrap();
    dir
}

/// A path below a regular file cannot even be inspected (ENOTDIR)
fn uninspectable(base: &Path) -> PathBuf {
    let file = base.join("blocker");
    fs::write(&file, b"").unwrap();
    file.join("data9")
}

#[tokio::test]
async fn test_existing_removed_and_missing_skipped() {
    let tmp = TempDir::new().unwrap();
    let existing = make_dir_with_wal(tmp.path(), "data1");
    let missing = tmp.path().join("data2");

    let report = DataCleaner::new(vec![existing.clone(), missing.clone()])
        .clean()
        .await
        .unwrap();

    assert!(!existing.exists());
    assert_eq!(report.outcome_of(&existing), Some(&CleanupOutcome::Removed));
    assert_eq!(report.outcome_of(&missing), Some(&CleanupOutcome::Absent));
    assert!(report.is_success());
}

#[tokio::test]
async fn test_cluster_layout_under_base_dir() {
    let tmp = TempDir::new().unwrap();
    make_dir_with_wal(tmp.path(), "data");
    make_dir_with_wal(tmp.path(), "data3");
    make_dir_with_wal(tmp.path(), "data6");

    let report = DataCleaner::for_cluster(6, Some(tmp.path()))
        .clean()
        .await
        .unwrap();

    assert_eq!(report.entries.len(), 7);
    assert_eq!(report.removed(), 3);
    assert_eq!(report.absent(), 4);
    assert!(!tmp.path().join("data").exists());
    assert!(!tmp.path().join("data3").exists());
    assert!(!tmp.path().join("data6").exists());
}

#[tokio::test]
async fn test_dry_run_leaves_directories() {
    let tmp = TempDir::new().unwrap();
    let existing = make_dir_with_wal(tmp.path(), "data1");

    let report = DataCleaner::new(vec![existing.clone()])
        .with_dry_run(true)
        .clean()
        .await
        .unwrap();

    assert!(existing.join("wal").join("000001.log").exists());
    assert_eq!(
        report.outcome_of(&existing),
        Some(&CleanupOutcome::WouldRemove)
    );
}

#[tokio::test]
async fn test_regular_file_is_not_removed() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("data1");
    fs::write(&file, b"not a directory").unwrap();

    let report = DataCleaner::new(vec![file.clone()]).clean().await.unwrap();

    assert!(file.exists());
    assert_eq!(report.outcome_of(&file), Some(&CleanupOutcome::Absent));
}

#[cfg(unix)]
#[tokio::test]
async fn test_failure_does_not_stop_remaining_paths() {
    let tmp = TempDir::new().unwrap();
    let broken = uninspectable(tmp.path());
    let after = make_dir_with_wal(tmp.path(), "data2");

    let report = DataCleaner::new(vec![broken.clone(), after.clone()])
        .clean()
        .await
        .unwrap();

    assert!(matches!(
        report.outcome_of(&broken),
        Some(CleanupOutcome::Failed(_))
    ));
    assert_eq!(report.outcome_of(&after), Some(&CleanupOutcome::Removed));
    assert!(!after.exists());
    assert!(matches!(
        report.into_result(),
        Err(CleanerError::Incomplete { failed: 1, total: 2 })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_fail_fast_stops_at_first_failure() {
    let tmp = TempDir::new().unwrap();
    let broken = uninspectable(tmp.path());
    let after = make_dir_with_wal(tmp.path(), "data2");

    let result = DataCleaner::new(vec![broken.clone(), after.clone()])
        .with_fail_fast(true)
        .clean()
        .await;

    match result {
        Err(CleanerError::Remove { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected Remove error, got {other:?}"),
    }
    assert!(after.exists());
}

#[tokio::test]
async fn test_json_report_lists_every_path() {
    let tmp = TempDir::new().unwrap();
    let existing = make_dir_with_wal(tmp.path(), "data1");
    let missing = tmp.path().join("data2");

    let report = DataCleaner::new(vec![existing, missing])
        .clean()
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    let statuses: Vec<&str> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["outcome"]["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["removed", "absent"]);
}
