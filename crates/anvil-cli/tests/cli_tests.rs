//! End-to-end tests driving the `anvil` binary against a throwaway db/root.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let db = dir.join("db");
    let root = dir.join("root");
    std::fs::create_dir_all(&root).unwrap();
    let config_path = dir.join("config.yml");
    std::fs::write(
        &config_path,
        format!(
            "repositories:\n  main:\n    target: {db}/source\n    handler: cp\narchitectures:\n  default: amd64\n  enabled:\n    - amd64\ngroups: null\ndb: {db}\nroot: {root}\n",
            db = db.display(),
            root = root.display(),
        ),
    )
    .unwrap();

    let available = db.join("available").join("main");
    std::fs::create_dir_all(&available).unwrap();
    std::fs::write(
        available.join("amd64.yml"),
        "hello:\n  \"1.0\":\n    amd64:\n      information:\n        tags: [greeting]\n",
    )
    .unwrap();

    config_path
}

fn anvil() -> Command {
    Command::cargo_bin("anvil").unwrap()
}

#[test]
fn search_finds_a_package_by_tag() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    anvil()
        .args(["--config", config.to_str().unwrap(), "search", "greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn install_without_a_checksum_extracts_no_payload_but_records_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    anvil()
        .args(["--config", config.to_str().unwrap(), "--yes", "install", "hello:amd64"])
        .assert()
        .success();

    let metadata = dir.path().join("db/installed/hello/1.0/amd64/metadata.yml");
    assert!(metadata.is_file());
}

#[test]
fn uninstall_after_install_removes_the_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    anvil().args(["--config", config.to_str().unwrap(), "--yes", "install", "hello:amd64"]).assert().success();
    anvil().args(["--config", config.to_str().unwrap(), "--yes", "uninstall", "hello:amd64"]).assert().success();

    let package_dir = dir.path().join("db/installed/hello/1.0/amd64");
    assert!(!package_dir.exists());
}

#[test]
fn installing_an_unknown_target_fails_with_a_nonzero_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    anvil()
        .args(["--config", config.to_str().unwrap(), "--yes", "install", "does-not-exist:amd64"])
        .assert()
        .failure();
}

#[test]
fn enable_local_persists_the_repository_into_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let local_repo = dir.path().join("local-repo");
    std::fs::create_dir_all(&local_repo).unwrap();

    anvil()
        .args(["--config", config.to_str().unwrap(), "--yes", "enable-local", "extra", local_repo.to_str().unwrap()])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&config).unwrap();
    assert!(contents.contains("extra"));
}
