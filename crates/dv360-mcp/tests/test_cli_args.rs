//! CLI argument parsing and startup tests for DV360 MCP

mod common;

use assert_cmd::Command;
use common::TestEnv;
use predicates::prelude::*;

fn dv360() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dv360-mcp"))
}

#[test]
fn test_help_flag() {
    let mut cmd = dv360();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Display & Video 360 MCP tool server"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--partner-id"));
}

#[test]
fn test_version_flag() {
    let mut cmd = dv360();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_serve_command_help() {
    let mut cmd = dv360();
    cmd.args(["serve", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stdio"));
}

#[test]
fn test_check_command_help() {
    let mut cmd = dv360();
    cmd.args(["check", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Validate credentials"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = dv360();
    cmd.arg("bogus");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_flag() {
    let mut cmd = dv360();
    cmd.arg("--no-such-flag");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

// ============================================================================
// Startup credential validation
// ============================================================================

#[test]
fn test_default_command_exits_without_credentials() {
    let env = TestEnv::default();
    env.command()
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DV360_SERVICE_ACCOUNT"));
}

#[test]
fn test_serve_exits_without_credentials() {
    let env = TestEnv::default();
    env.command()
        .arg("serve")
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("environment variable not set"));
}

#[test]
fn test_check_exits_without_credentials() {
    let env = TestEnv::default();
    env.command()
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DV360_SERVICE_ACCOUNT"));
}

#[test]
fn test_check_rejects_malformed_json_from_env_file() {
    let env = TestEnv::default();
    env.write_env_file("DV360_SERVICE_ACCOUNT='{not json'\n").unwrap();
    env.command()
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON in DV360_SERVICE_ACCOUNT"));
}

#[test]
fn test_check_rejects_incomplete_credentials() {
    let env = TestEnv::default();
    env.command()
        .arg("check")
        .env("DV360_SERVICE_ACCOUNT", r#"{"type": "service_account"}"#)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("client_email"));
}
