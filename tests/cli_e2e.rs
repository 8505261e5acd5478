//! End-to-end CLI tests for the httpsend binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A target source is required: invoking with no flags is a usage error.
#[test]
fn test_binary_without_source_is_usage_error() {
    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

/// `-u` and `-f` together abort before any network activity.
#[test]
fn test_binary_rejects_url_and_file_together() {
    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.args(["-u", "https://example.com", "-f", "urls.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

/// Only GET is supported; other methods are usage errors.
#[test]
fn test_binary_rejects_post_method() {
    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.args(["-u", "https://example.com", "-X", "POST"])
        .assert()
        .failure();
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Send many HTTP requests"))
        .stdout(predicate::str::contains("--fs"))
        .stdout(predicate::str::contains("--ms"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("httpsend"));
}

/// An empty target list exits cleanly without creating a run directory.
#[test]
fn test_binary_empty_target_list_exits_clean() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("empty.txt");
    std::fs::write(&list, "").unwrap();

    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.args(["-f", list.to_str().unwrap(), "-d"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(!dir.path().join("httpsend-output").exists());
}

/// A connection-refused target is a per-URL diagnostic, not a process
/// failure: the run still exits 0 and the run directory exists.
#[test]
fn test_binary_fetch_failure_is_not_fatal() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.args(["-u", "http://127.0.0.1:1/dead", "-d"])
        .arg(dir.path())
        .assert()
        .success();

    let run_dir = dir.path().join("httpsend-output");
    assert!(run_dir.is_dir(), "run directory should have been created");
    assert_eq!(
        std::fs::read_dir(&run_dir).unwrap().count(),
        0,
        "nothing should be written for a failed fetch"
    );
}

/// An invalid target URL is likewise non-fatal.
#[test]
fn test_binary_invalid_url_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("urls.txt");
    std::fs::write(&list, "not-a-url\n").unwrap();

    let mut cmd = Command::cargo_bin("httpsend").unwrap();
    cmd.args(["-f", list.to_str().unwrap(), "-d"])
        .arg(dir.path())
        .assert()
        .success();
}
