//! Settings file loading.
//!
//! A process reads its own settings file and, optionally, a shared "common"
//! file maintained for a whole fleet. Keys set in the local file win; keys
//! only present in the common file are inherited.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::config::merger::merge_layers;
use crate::config::schema::Settings;
use crate::error::{OpkitError, Result};

/// Load a settings file as a raw YAML value.
///
/// An empty file is treated as an empty mapping.
pub fn load_settings_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OpkitError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            OpkitError::Io(e)
        }
    })?;

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| OpkitError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    })
}

/// Load settings from `local`, layered over the optional `common` file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if either file is missing,
/// `ConfigParseError` if either is not valid settings YAML and
/// `ConfigValidationError` if the merged values are unusable.
pub fn load_settings(local: &Path, common: Option<&Path>) -> Result<Settings> {
    let mut layers = Vec::new();
    if let Some(common) = common {
        layers.push(load_settings_value(common)?);
    }
    layers.push(load_settings_value(local)?);

    let merged = merge_layers(&layers);
    let settings: Settings =
        serde_yaml::from_value(merged).map_err(|e| OpkitError::ConfigParseError {
            path: local.to_path_buf(),
            message: e.to_string(),
        })?;

    validate(&settings)?;
    Ok(settings)
}

/// Check values that deserialize fine but cannot be used.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.executor.retry_err_delay_ms == 0 {
        return Err(OpkitError::ConfigValidationError {
            message: "executor.retry_err_delay_ms must be greater than zero".to_string(),
        });
    }
    crate::logging::parse_level(&settings.logging.level)?;
    crate::logging::parse_level(&settings.logging.stderr_level)?;
    Ok(())
}
