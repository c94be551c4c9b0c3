//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// opkit - Step chain executor for reconcile loops.
#[derive(Debug, Parser)]
#[command(name = "opkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the local settings file
    #[arg(short, long, global = true, env = "OPKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the shared settings file the local file is layered over
    #[arg(long, global = true, env = "OPKIT_COMMON_CONFIG")]
    pub common_config: Option<PathBuf>,

    /// Enable debug logging and step tracing
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a scripted reconcile plan once and print the outcome
    Run(RunArgs),

    /// Generate a random password
    Password(PasswordArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Plan file to execute
    pub plan: PathBuf,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `password` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PasswordArgs {
    /// Number of characters
    #[arg(short, long, default_value_t = 16)]
    pub length: usize,

    /// Character set: num, char, mix or advance
    #[arg(short, long, default_value = "mix")]
    pub kind: String,
}
