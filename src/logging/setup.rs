//! Process-wide tracing subscriber installation.

use std::fs;
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::filter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;
use crate::error::{OpkitError, Result};

/// Rolling file for events below WARN, written under `LoggingSettings::path`.
pub const INFO_LOG_FILE_NAME: &str = "application_info.log";

/// Rolling file for WARN and ERROR events.
pub const ERROR_LOG_FILE_NAME: &str = "application_error.log";

/// Parse a level name such as `info` or `WARN`.
pub fn parse_level(value: &str) -> Result<Level> {
    Level::from_str(value.trim()).map_err(|_| OpkitError::ConfigValidationError {
        message: format!("unknown log level '{}'", value),
    })
}

/// Whether an event belongs in the error file rather than the info file.
fn is_error_level(level: &Level) -> bool {
    *level <= Level::WARN
}

/// Install the global subscriber.
///
/// Console output goes to stderr and is filtered by `stderr_level`, unless
/// `RUST_LOG` is set or `debug` forces debug output. When `path` is set, JSON
/// lines at `level` and above are also written to two daily rolling files in
/// that directory: WARN and ERROR go to [`ERROR_LOG_FILE_NAME`], everything
/// else to [`INFO_LOG_FILE_NAME`].
pub fn init(settings: &LoggingSettings, debug: bool) -> Result<()> {
    let stderr_level = parse_level(&settings.stderr_level)?;
    let file_level = parse_level(&settings.level)?;

    let console_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(stderr_level.to_string().to_ascii_lowercase()))
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (info_file, error_file) = match &settings.path {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let info = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(tracing_appender::rolling::daily(dir, INFO_LOG_FILE_NAME))
                .with_filter(filter::filter_fn(move |meta: &Metadata<'_>| {
                    !is_error_level(meta.level()) && *meta.level() <= file_level
                }));
            let error = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(tracing_appender::rolling::daily(dir, ERROR_LOG_FILE_NAME))
                .with_filter(filter::filter_fn(move |meta: &Metadata<'_>| {
                    is_error_level(meta.level()) && *meta.level() <= file_level
                }));
            (Some(info), Some(error))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(info_file)
        .with(error_file)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}

/// Route panic reports through `tracing` at DEBUG instead of raw stderr.
///
/// The executor already logs every panic it recovers at ERROR, so the
/// default hook's `thread 'main' panicked at` line only duplicates it.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::debug!("{}", info);
    }));
}
