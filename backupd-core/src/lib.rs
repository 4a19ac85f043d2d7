//! Backupd core library — configuration types, YAML loading, errors.
//!
//! Public API surface:
//! - [`config`] — [`Config`], [`BackupEntry`], derived paths
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;

pub use config::{config_path_at, BackupEntry, Config, CONFIG_FILE, DEFAULT_RSYNC_OPTIONS};
pub use error::ConfigError;
