//! Integration tests for the opkit binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_plan(plan: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("plan.yml"), plan).unwrap();
    temp
}

fn report(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

const REQUEUE_PLAN: &str = r#"
name: mysql
namespace: db
steps:
  - name: EnsurePods
    action: continue
    message: pods created
  - name: CheckReady
    action: retry_after
    after_ms: 3000
  - name: Unreachable
    action: error
deferred:
  - name: SyncStatus
    action: pass
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("password"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_run_reports_requeue() -> Result<(), Box<dyn std::error::Error>> {
    let temp = write_plan(REQUEUE_PLAN);
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path()).args(["run", "plan.yml"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let report = report(&output);

    assert_eq!(report["requeue"], true);
    assert_eq!(report["requeue_after_ms"], 3000);
    assert!(report["error"].is_null());
    assert_eq!(report["steps_executed"], 3);
    Ok(())
}

#[test]
fn cli_run_error_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = write_plan(
        r#"
name: mysql
steps:
  - action: error
    message: replication broken
"#,
    );
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path()).args(["run", "plan.yml"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("replication broken"));
    Ok(())
}

#[test]
fn cli_run_recovers_panics() -> Result<(), Box<dyn std::error::Error>> {
    let temp = write_plan(
        r#"
name: mysql
steps:
  - action: panic
    message: index out of range
deferred:
  - action: continue
    message: cleanup ran
"#,
    );
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path())
        .env("RUST_LOG", "info")
        .args(["run", "plan.yml"]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("recovered from panic"))
        .stderr(predicate::str::contains("cleanup ran"))
        .stderr(predicate::str::contains("panicked at").not());
    Ok(())
}

#[test]
fn cli_run_debug_traces_transitions() -> Result<(), Box<dyn std::error::Error>> {
    let temp = write_plan(REQUEUE_PLAN);
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path())
        .args(["--debug", "run", "plan.yml"]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("BEGIN"))
        .stderr(predicate::str::contains("BREAK"))
        .stderr(predicate::str::contains("COMPLETE"));
    Ok(())
}

#[test]
fn cli_run_missing_plan_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path()).args(["run", "absent.yml"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn cli_invalid_settings_exit_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = write_plan(REQUEUE_PLAN);
    fs::write(
        temp.path().join("opkit.yml"),
        "executor:\n  retry_err_delay_ms: 0\n",
    )?;
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path())
        .args(["--config", "opkit.yml", "run", "plan.yml"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("retry_err_delay_ms"));
    Ok(())
}

fn read_logs(dir: &Path, prefix: &str) -> String {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| fs::read_to_string(entry.path()).unwrap_or_default())
        .collect()
}

#[test]
fn cli_settings_file_splits_json_logs_by_level() -> Result<(), Box<dyn std::error::Error>> {
    let temp = write_plan(
        r#"
name: mysql
steps:
  - name: CheckReady
    action: continue
    message: replicas ready
deferred:
  - name: SyncStatus
    action: error
    message: status write rejected
"#,
    );
    let logs = temp.path().join("logs");
    fs::write(
        temp.path().join("opkit.yml"),
        format!(
            "run_mode: debug\nlogging:\n  level: debug\n  path: {}\n",
            logs.display()
        ),
    )?;
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.current_dir(temp.path())
        .args(["--config", "opkit.yml", "run", "plan.yml"]);
    cmd.assert().code(1);

    let info = read_logs(&logs, "application_info.log");
    let error = read_logs(&logs, "application_error.log");

    assert!(info.contains("replicas ready"));
    assert!(error.contains("status write rejected"));
    assert!(!error.contains("replicas ready"));

    let line = info
        .lines()
        .find(|line| line.contains("replicas ready"))
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(line)?;
    assert_eq!(event["fields"]["action"], "CheckReady");
    assert_eq!(event["fields"]["step"], "0");
    assert!(!event["fields"]["message"]
        .as_str()
        .unwrap()
        .contains("action="));
    Ok(())
}

#[test]
fn cli_password_length_and_kind() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("opkit"));
    cmd.args(["password", "--length", "24", "--kind", "num"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9]{24}\n$")?);
    Ok(())
}
