use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the service loop and pid-file lifecycle management.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] backupd_core::ConfigError),

    #[error("daemon already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("daemon is not running (pid file missing: {pid_path})")]
    NotRunning { pid_path: PathBuf },

    #[error("pid file at {path} does not contain a valid pid")]
    InvalidPidFile { path: PathBuf },

    #[error("failed to signal daemon: {0}")]
    Signal(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
