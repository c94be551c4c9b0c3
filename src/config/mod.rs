//! Settings loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File loading and layering in [`loader`]
//! - Deep merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use opkit::config::load_settings;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("opkit.yml");
//! fs::write(&path, "run_mode: debug\nexecutor:\n  retry_err_delay_ms: 2000\n").unwrap();
//!
//! let settings = load_settings(&path, None).unwrap();
//! assert!(settings.is_debug());
//! assert_eq!(settings.executor.retry_err_delay_ms, 2000);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{load_settings, load_settings_value, validate};
pub use merger::{deep_merge, merge_layers};
pub use schema::{ExecutorSettings, LoggingSettings, RunMode, Settings};
