// SPDX-License-Identifier: Apache-2.0

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config and credential files.
fn isolated(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.env("XDG_CONFIG_HOME", dir.path())
        .env(
            "UBT_LAUNCHPAD__CREDENTIALS_FILE",
            dir.path().join("lp_creds").to_string_lossy().to_string(),
        )
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ubuntu-bug-triage"));
}

#[test]
fn test_help_lists_options_and_commands() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--team"))
        .stdout(predicate::str::contains("--include-project"))
        .stdout(predicate::str::contains("--any-tag"))
        .stdout(predicate::str::contains("--ignore-user"))
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_completion_bash() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

#[test]
fn test_completion_zsh() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.arg("completion")
        .arg("zsh")
        .assert()
        .success()
        .stdout(predicate::str::contains("compdef").or(predicate::str::contains("zsh")));
}

#[test]
fn test_auth_status_without_credentials() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not authenticated"));
}

#[test]
fn test_auth_status_json() {
    let dir = TempDir::new().unwrap();
    let output = isolated(&dir)
        .args(["auth", "status", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["authenticated"], serde_json::Value::Bool(false));
    assert!(json["username"].is_null());
}

#[test]
fn test_auth_logout_without_credentials() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No credential file"));
}

#[test]
fn test_triage_without_credentials_requires_login() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("cloud-init")
        .assert()
        .failure()
        .code(predicate::eq(1))
        .stderr(predicate::str::contains("auth login"));
}

#[test]
fn test_invalid_since_is_rejected_before_connecting() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["--anon", "cloud-init", "last-week"])
        .assert()
        .failure()
        .code(predicate::eq(1))
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_invalid_flag() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.arg("--no-such-flag")
        .assert()
        .failure()
        .code(predicate::eq(2));
}

#[test]
fn test_invalid_output_format() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.args(["auth", "status", "--output", "xml"])
        .assert()
        .failure()
        .code(predicate::eq(2))
        .stderr(predicate::str::contains("invalid").or(predicate::str::contains("xml")));
}

#[test]
fn test_auth_invalid_subcommand() {
    let mut cmd = cargo_bin_cmd!("ubuntu-bug-triage");
    cmd.args(["auth", "invalid"])
        .assert()
        .failure()
        .code(predicate::eq(2));
}
