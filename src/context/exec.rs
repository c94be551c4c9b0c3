//! Exec-in-pod capability boundary.
//!
//! Transport lives with the implementor; this module only fixes the request
//! shape and the checks every implementation performs before streaming.

use std::time::Duration;

use crate::error::{OpkitError, Result};
use crate::logging::Logger;

/// Timeout applied when a request leaves it unset.
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(5);

/// The pod a command runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
    pub containers: Vec<String>,
}

impl PodRef {
    pub fn has_container(&self, container: &str) -> bool {
        self.containers.iter().any(|c| c == container)
    }
}

/// Options for a single exec request.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Logger for the "Executing command" line; silent when unset.
    pub logger: Option<Logger>,

    /// Bytes written to the command's stdin.
    pub stdin: Option<Vec<u8>>,

    pub capture_stdout: bool,

    pub capture_stderr: bool,

    /// Zero means [`DEFAULT_EXEC_TIMEOUT`].
    pub timeout: Duration,
}

impl ExecOptions {
    /// Fill in the timeout, and capture stdout when no stream was requested.
    pub fn with_defaults(mut self) -> Self {
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_EXEC_TIMEOUT;
        }
        if self.stdin.is_none() && !self.capture_stdout && !self.capture_stderr {
            self.capture_stdout = true;
        }
        self
    }
}

/// Captured output of an exec request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs commands inside pod containers.
pub trait PodExec {
    fn pod_exec(
        &self,
        pod: &PodRef,
        container: &str,
        command: &[String],
        opts: ExecOptions,
    ) -> Result<ExecOutput>;
}

/// Fail with `ContainerNotFound` unless `pod` has `container`.
pub fn ensure_container(pod: &PodRef, container: &str) -> Result<()> {
    if pod.has_container(container) {
        Ok(())
    } else {
        Err(OpkitError::ContainerNotFound {
            container: container.to_string(),
            pod: pod.name.clone(),
        })
    }
}

/// Validate the target, apply defaults and log the request.
///
/// [`PodExec`] implementations call this before opening a stream.
pub fn prepare_exec(
    pod: &PodRef,
    container: &str,
    command: &[String],
    opts: ExecOptions,
) -> Result<ExecOptions> {
    ensure_container(pod, container)?;
    let opts = opts.with_defaults();

    if let Some(logger) = &opts.logger {
        logger.info(
            "Executing command",
            &[
                ("pod", &pod.name),
                ("container", &container),
                ("command", &command.join(" ")),
                ("timeout", &format!("{:?}", opts.timeout)),
            ],
        );
    }

    Ok(opts)
}
