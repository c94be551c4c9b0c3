//! Command-line interface for opkit.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, PasswordArgs, RunArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
