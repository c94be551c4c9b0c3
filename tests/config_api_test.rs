//! Integration tests for config module public API.

use opkit::config::{load_settings, validate, RunMode, Settings};
use opkit::engine::{Executor, Flow, Requeue, Step, Task};
use opkit::logging::Logger;
use opkit::{BaseReconcileContext, ObjectKey, OpkitError, WorkContext};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn public_api_is_accessible() {
    let settings = Settings::default();
    validate(&settings).unwrap();
    assert_eq!(settings.run_mode, RunMode::Dev);
}

#[test]
fn local_settings_override_common() {
    let temp = TempDir::new().unwrap();
    let common = temp.path().join("common.yml");
    let local = temp.path().join("local.yml");

    fs::write(
        &common,
        r#"
run_mode: prod
logging:
  level: warn
  stderr_level: warn
executor:
  retry_err_delay_ms: 5000
"#,
    )
    .unwrap();
    fs::write(&local, "run_mode: sit\nlogging:\n  stderr_level: error\n").unwrap();

    let settings = load_settings(&local, Some(&common)).unwrap();

    assert_eq!(settings.run_mode, RunMode::Sit);
    assert_eq!(settings.logging.level, "warn");
    assert_eq!(settings.logging.stderr_level, "error");
    assert_eq!(settings.executor.retry_err_delay(), Duration::from_secs(5));
}

#[test]
fn zero_retry_delay_is_rejected() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local.yml");
    fs::write(&local, "executor:\n  retry_err_delay_ms: 0\n").unwrap();

    let err = load_settings(&local, None).unwrap_err();
    assert!(matches!(err, OpkitError::ConfigValidationError { .. }));
}

#[test]
fn missing_common_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local.yml");
    fs::write(&local, "").unwrap();

    let err = load_settings(&local, Some(&temp.path().join("absent.yml"))).unwrap_err();
    assert!(matches!(err, OpkitError::ConfigNotFound { .. }));
}

#[test]
fn executor_picks_up_retry_delay_from_settings() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local.yml");
    fs::write(&local, "executor:\n  retry_err_delay_ms: 250\n").unwrap();
    let settings = load_settings(&local, None).unwrap();

    let mut rc = BaseReconcileContext::new(
        ObjectKey::new("db", "mysql"),
        WorkContext::background(),
        "test",
    );
    let mut task = Task::new();
    task.add_step(Step::new(
        "Flaky",
        |_: &mut BaseReconcileContext, flow: &Flow| {
            flow.retry_err(anyhow::anyhow!("connection reset"), "query failed", &[])
        },
    ));

    let outcome = Executor::from_settings(Logger::new(), &settings).execute(&mut rc, task);
    assert_eq!(outcome.unwrap(), Requeue::After(Duration::from_millis(250)));
}
