//! Structured logging for reconcile chains.
//!
//! - [`Logger`] - a named logger carrying key/value context, emitting
//!   `tracing` events
//! - [`init`] - install the process-wide `tracing` subscriber from
//!   [`LoggingSettings`](crate::config::LoggingSettings)

pub mod logger;
pub mod setup;

pub use logger::{KeyValues, Logger};
pub use setup::{init, install_panic_hook, parse_level, ERROR_LOG_FILE_NAME, INFO_LOG_FILE_NAME};
