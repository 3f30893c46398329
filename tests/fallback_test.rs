use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let csv = common::commands_file(&["create, t1, Garden-1", "order, t1, Tea, 100.0"]);

    let mut cmd = Command::new(cargo_bin!("tabledger"));
    cmd.env_remove("RUST_LOG")
        .arg(csv.path())
        .arg("--db-path")
        .arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."))
        .stdout(predicate::str::contains("t1,Garden-1,100.00,0.00,100.00,occupied"));
}

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_fallback_warning_follows_log_level() {
    let csv = common::commands_file(&["create, t1, Garden-1"]);

    let mut cmd = Command::new(cargo_bin!("tabledger"));
    cmd.env_remove("RUST_LOG")
        .arg(csv.path())
        .arg("--db-path")
        .arg("some_db")
        .arg("--log-level")
        .arg("error");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not())
        .stdout(predicate::str::contains("t1,Garden-1,0.00,0.00,0.00,available"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let csv = common::commands_file(&["create, t1, Garden-1", "order, t1, Tea, 100.0"]);

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("tabledger"));
    cmd.arg(csv.path()).arg("--db-path").arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}
