//! The reload-and-run service loop.
//!
//! One cycle = reload configuration, run every configured backup in order,
//! sleep for the configured interval. Configuration and I/O errors inside a
//! cycle are logged as warnings and the loop continues; synchronization
//! failures are booleans handled inside [`Backup`] and never abort a cycle.
//! Anything else (a programming error) propagates to the process
//! supervisor — the loop deliberately does not catch-all.

use std::path::PathBuf;
use std::thread;

use backupd_core::Config;
use backupd_sync::Backup;

use crate::error::DaemonError;
use crate::log_rotation;

/// Construct the process-wide tracing subscriber.
///
/// Called once from the `run` entry point with the configured level;
/// `RUST_LOG` takes precedence when set. Nothing is initialized at module
/// load.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Performs backups at a fixed interval, reloading configuration each cycle.
pub struct Service {
    config_path: PathBuf,
    config: Config,
    backups: Vec<Backup>,
}

impl Service {
    /// Create the service from the configuration file.
    ///
    /// The initial load must succeed: a missing or broken config at startup
    /// is fatal and propagates to the caller.
    pub fn new(config_path: PathBuf) -> Result<Self, DaemonError> {
        let config = Config::load(&config_path)?;
        Ok(Self::with_config(config_path, config))
    }

    /// Build the service from an already-parsed configuration, so callers
    /// that load the config for other startup work (tracing level) do not
    /// read the file a second time.
    pub fn with_config(config_path: PathBuf, config: Config) -> Self {
        let backups = build_backups(&config);
        Self {
            config_path,
            config,
            backups,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    /// Re-read the configuration file and rebuild the whole backup list.
    ///
    /// The new config is parsed before any state is touched, so a failed
    /// reload leaves the last-good configuration (and its backups) in
    /// place for the following cycles.
    pub fn load_cfg(&mut self) -> Result<(), DaemonError> {
        let config = Config::load(&self.config_path)?;
        self.backups = build_backups(&config);
        self.config = config;
        Ok(())
    }

    /// One cycle: reload, then run all configured backups in order.
    pub fn run_cycle(&mut self) -> Result<(), DaemonError> {
        self.load_cfg()?;
        execute_all(&self.backups);
        Ok(())
    }

    /// The unbounded service loop. Termination is external (signal).
    pub fn run(&mut self) {
        tracing::info!("backupd service started");

        loop {
            if let Err(err) = self.run_cycle() {
                tracing::warn!(error = %err, "failed to schedule backup");
            }
            log_rotation::rotate(&self.config.log_path());
            thread::sleep(self.config.interval());
        }
    }
}

fn build_backups(config: &Config) -> Vec<Backup> {
    config.backups.iter().map(Backup::from_entry).collect()
}

/// Run every backup in configured order, logging each pair and the overall
/// outcome. Failures are reported by the synchronizer; later backups still
/// run.
fn execute_all(backups: &[Backup]) {
    if backups.is_empty() {
        tracing::info!("no backups configured");
        return;
    }

    tracing::info!("starting backup");
    for backup in backups {
        tracing::info!(
            src = %backup.src().display(),
            dst = %backup.dst().display(),
            "backing up",
        );
        backup.do_backup_now();
    }
    tracing::info!("backup complete");
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use backupd_core::{config_path_at, ConfigError};
    use backupd_sync::Synchronizer;
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
        let path = config_path_at(dir.path());
        std::fs::write(&path, yaml).expect("write config");
        path
    }

    const TWO_BACKUPS: &str = r#"
path: /var/lib/backupd
backups:
  - src: /home/a
    dst: /mnt/a
  - src: /home/b
    dst: /mnt/b
"#;

    #[test]
    fn new_fails_when_config_missing() {
        let dir = TempDir::new().expect("tempdir");
        let err = Service::new(config_path_at(dir.path()))
            .err()
            .expect("missing config must fail startup");
        assert!(matches!(
            err,
            DaemonError::Config(ConfigError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn new_builds_one_backup_per_entry() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, TWO_BACKUPS);
        let service = Service::new(path).expect("new");
        assert_eq!(service.backups().len(), 2);
        assert_eq!(service.backups()[0].src(), Path::new("/home/a"));
    }

    #[test]
    fn with_config_starts_from_parsed_config_without_rereading() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, TWO_BACKUPS);
        let config = Config::load(&path).expect("load");

        // The file changing after parse must not affect startup state.
        write_config(&dir, "path: /var/lib/backupd\n");
        let service = Service::with_config(path, config);
        assert_eq!(service.backups().len(), 2);
    }

    #[test]
    fn reload_rebuilds_backup_list_from_changed_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, TWO_BACKUPS);
        let mut service = Service::new(path).expect("new");

        write_config(&dir, "path: /var/lib/backupd\n");
        service.load_cfg().expect("reload");
        assert!(service.backups().is_empty());
    }

    #[test]
    fn failed_reload_keeps_last_good_config() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, TWO_BACKUPS);
        let mut service = Service::new(path).expect("new");

        write_config(&dir, "path: [broken\n");
        let err = service.load_cfg().unwrap_err();
        assert!(matches!(err, DaemonError::Config(ConfigError::Parse { .. })));

        // Previous backups and interval stay in effect.
        assert_eq!(service.backups().len(), 2);
        assert_eq!(service.config().backup_interval_mins, 1);
    }

    #[test]
    fn cycle_with_no_backups_succeeds() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, "path: /var/lib/backupd\n");
        let mut service = Service::new(path).expect("new");
        service.run_cycle().expect("cycle");
    }

    struct Recording {
        label: &'static str,
        result: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Synchronizer for Recording {
        fn sync(&self, _src: &Path, _dst: &Path) -> bool {
            self.log.lock().expect("lock").push(self.label);
            self.result
        }
    }

    fn recording_backup(
        label: &'static str,
        result: bool,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Backup {
        Backup::with_synchronizer(
            PathBuf::from(format!("/src/{label}")),
            PathBuf::from(format!("/dst/{label}")),
            Box::new(Recording {
                label,
                result,
                log: log.clone(),
            }),
        )
    }

    #[test]
    fn backups_run_in_configured_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let backups = vec![
            recording_backup("first", true, &log),
            recording_backup("second", true, &log),
            recording_backup("third", true, &log),
        ];
        execute_all(&backups);
        assert_eq!(*log.lock().expect("lock"), vec!["first", "second", "third"]);
    }

    #[test]
    fn one_failing_backup_does_not_stop_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let backups = vec![
            recording_backup("ok", true, &log),
            recording_backup("bad", false, &log),
            recording_backup("after-bad", true, &log),
        ];
        execute_all(&backups);
        assert_eq!(log.lock().expect("lock").len(), 3);
    }
}
