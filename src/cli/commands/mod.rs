//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`], which owns the loaded settings.

pub mod dispatcher;
pub mod password;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
