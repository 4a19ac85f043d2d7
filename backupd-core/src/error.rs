//! Error types for backupd-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    /// A missing required key (`path`) surfaces here too.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file did not exist at the expected path.
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },
}
