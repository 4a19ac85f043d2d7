//! Daemon configuration loaded from `backupd.yaml`.
//!
//! # File format
//!
//! ```yaml
//! path: /var/lib/backupd          # base dir for log + pid files (required)
//! backup_interval_mins: 15        # optional, default 1
//! log_level: info                 # optional tracing filter, default "info"
//! backups:                        # optional, default empty; run in order
//!   - src: /home/user/documents
//!     dst: /mnt/backup/documents
//!     rsync_options: --archive    # optional, default "--archive"
//! ```
//!
//! The file lives at a fixed location relative to the process working
//! directory; use [`config_path_at`] to derive it. Tests always pass an
//! explicit directory (`TempDir`), never the real cwd.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Well-known configuration file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "backupd.yaml";

/// Option string handed to rsync when a backup entry does not set its own.
pub const DEFAULT_RSYNC_OPTIONS: &str = "--archive";

const LOG_FILE: &str = "backupd.log";
const PID_FILE: &str = "backupd.pid";

/// `<dir>/backupd.yaml` — pure, no I/O.
pub fn config_path_at(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// One configured source→destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    /// Path handed to rsync as the transfer source.
    pub src: PathBuf,
    /// Path handed to rsync as the transfer destination.
    pub dst: PathBuf,
    /// Option string for the rsync invocation; `--archive` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsync_options: Option<String>,
}

/// Root of the backupd YAML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base directory for the daemon's log and pid files.
    pub path: PathBuf,
    #[serde(default = "default_interval_mins")]
    pub backup_interval_mins: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub backups: Vec<BackupEntry>,
}

fn default_interval_mins() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load and parse the configuration file.
    ///
    /// Returns `ConfigError::ConfigNotFound` if absent,
    /// `ConfigError::Parse` (with path + line context) if malformed YAML
    /// or missing the required `path` key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Sleep duration between cycles: `backup_interval_mins * 60` seconds.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_mins * 60)
    }

    /// `<path>/backupd.log`
    pub fn log_path(&self) -> PathBuf {
        self.path.join(LOG_FILE)
    }

    /// `<path>/backupd.pid`
    pub fn pid_path(&self) -> PathBuf {
        self.path.join(PID_FILE)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
