//! opkit CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use opkit::cli::{Cli, CommandDispatcher};
use opkit::config::{load_settings, Settings};
use opkit::Result;

/// Resolve settings from the `--config` / `--common-config` flags.
///
/// With neither flag the defaults are used; a common file alone is loaded as
/// the only layer.
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    match (&cli.config, &cli.common_config) {
        (Some(local), common) => load_settings(local, common.as_deref()),
        (None, Some(common)) => load_settings(common, None),
        (None, None) => Ok(Settings::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = opkit::logging::init(&settings.logging, cli.debug || settings.is_debug()) {
        eprintln!("Error: {}", e);
        return ExitCode::from(2);
    }
    opkit::logging::install_panic_hook();

    tracing::debug!("opkit starting with args: {:?}", cli);

    let dispatcher = CommandDispatcher::new(settings);
    let mut stdout = io::stdout().lock();

    match dispatcher.dispatch(&cli, &mut stdout) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
