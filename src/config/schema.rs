//! Settings schema.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deployment mode the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Verbose tracing of every step transition.
    Debug,
    #[default]
    Dev,
    /// System integration testing.
    Sit,
    Prod,
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub run_mode: RunMode,
    pub logging: LoggingSettings,
    pub executor: ExecutorSettings,
}

impl Settings {
    pub fn is_dev(&self) -> bool {
        self.run_mode == RunMode::Dev
    }

    pub fn is_prod(&self) -> bool {
        self.run_mode == RunMode::Prod
    }

    /// Debug mode also turns on step tracing in executors built from
    /// these settings.
    pub fn is_debug(&self) -> bool {
        self.run_mode == RunMode::Debug
    }
}

/// Log sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level written to the log file.
    pub level: String,

    /// Minimum level written to stderr.
    pub stderr_level: String,

    /// Directory for the rolling log file; no file output when unset.
    pub path: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stderr_level: "info".to_string(),
            path: None,
        }
    }
}

/// Defaults for executors built from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Emit BEGIN/transition trace lines for every step.
    pub debug: bool,

    /// Delay requested by `Flow::retry_err`, in milliseconds.
    pub retry_err_delay_ms: u64,
}

impl ExecutorSettings {
    pub fn retry_err_delay(&self) -> Duration {
        Duration::from_millis(self.retry_err_delay_ms)
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            debug: false,
            retry_err_delay_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.is_dev());
        assert_eq!(settings.executor.retry_err_delay(), Duration::from_secs(1));
    }

    #[test]
    fn run_mode_parses_lowercase() {
        let settings: Settings = serde_yaml::from_str("run_mode: prod").unwrap();
        assert!(settings.is_prod());
        assert!(!settings.is_debug());

        let settings: Settings = serde_yaml::from_str("run_mode: sit").unwrap();
        assert_eq!(settings.run_mode, RunMode::Sit);
    }

    #[test]
    fn partial_logging_keeps_other_defaults() {
        let settings: Settings = serde_yaml::from_str("logging:\n  level: debug\n").unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.stderr_level, "info");
        assert!(settings.logging.path.is_none());
    }

    #[test]
    fn unknown_run_mode_is_rejected() {
        let result: std::result::Result<Settings, _> = serde_yaml::from_str("run_mode: staging");
        assert!(result.is_err());
    }
}
