//! Error types for opkit operations.
//!
//! This module defines [`OpkitError`], the error type returned by step
//! actions and by the executor, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Steps report intentional failures through [`crate::Flow::error`], which
//!   produces [`OpkitError::Step`] wrapping the underlying cause
//! - Failures of deferred steps are combined into one
//!   [`OpkitError::DeferredSteps`]
//! - Panics inside steps never escape the executor; they surface as
//!   [`OpkitError::Recovered`]
//! - Use `anyhow::Error` (via `OpkitError::Other`) for collaborator errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for opkit operations.
#[derive(Debug, Error)]
pub enum OpkitError {
    /// A step stopped the chain with an error.
    #[error("{message}: {source}")]
    Step {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// One or more deferred steps failed.
    #[error("errors in deferred steps: {}", errors.join(", "))]
    DeferredSteps { errors: Vec<String> },

    /// A panic raised while executing the chain, converted to an error.
    #[error("recovered from panic: {message}")]
    Recovered { message: String },

    /// The work context was cancelled.
    #[error("reconcile cancelled")]
    Cancelled,

    /// The work context deadline passed.
    #[error("reconcile deadline exceeded")]
    DeadlineExceeded,

    /// Pod exec target does not have the requested container.
    #[error("container {container} not found in pod {pod}")]
    ContainerNotFound { container: String, pod: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OpkitError {
    /// Whether this error came from a recovered panic rather than a step.
    pub fn is_recovered(&self) -> bool {
        matches!(self, OpkitError::Recovered { .. })
    }
}

/// Result type alias for opkit operations.
pub type Result<T> = std::result::Result<T, OpkitError>;
