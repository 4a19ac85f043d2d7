//! Pid-file daemon lifecycle: start, stop, restart, status.
//!
//! `start` detaches by spawning a fresh `backupd run` child process with
//! stdout/stderr redirected to the log file under the configured `path`,
//! then records the child pid in `backupd.pid`. Liveness probes and
//! shutdown signalling shell out to `kill`, the platform's own tool for
//! the job.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::process::{Command, Stdio};

use backupd_core::{config_path_at, Config};
use serde_json::{json, Value};

use crate::error::{io_err, DaemonError};

/// Start the daemon for the configuration in `cwd`.
///
/// Fails if the config file is absent (startup is fatal without one) or if
/// a live daemon already owns the pid file. Returns the child pid.
pub fn start(cwd: &Path) -> Result<u32, DaemonError> {
    let config_path = config_path_at(cwd);
    let config = Config::load(&config_path)?;

    if !config.path.exists() {
        fs::create_dir_all(&config.path).map_err(|e| io_err(&config.path, e))?;
    }

    let pid_path = config.pid_path();
    if let Some(pid) = read_live_pid(&pid_path)? {
        return Err(DaemonError::AlreadyRunning { pid });
    }

    let log_path = config.log_path();
    let log = open_log(&log_path)?;
    let log_for_stderr = log.try_clone().map_err(|e| io_err(&log_path, e))?;

    let binary = std::env::current_exe().map_err(|e| io_err("current executable", e))?;
    let child = Command::new(&binary)
        .arg("run")
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_for_stderr))
        .spawn()
        .map_err(|e| io_err(&binary, e))?;

    let pid = child.id();
    write_pid(&pid_path, pid)?;
    Ok(pid)
}

/// Stop the running daemon: signal it and remove the pid file.
pub fn stop(cwd: &Path) -> Result<u32, DaemonError> {
    let config = Config::load(&config_path_at(cwd))?;
    let pid_path = config.pid_path();

    let pid = read_live_pid(&pid_path)?.ok_or(DaemonError::NotRunning {
        pid_path: pid_path.clone(),
    })?;

    signal(pid, "-TERM")?;
    fs::remove_file(&pid_path).map_err(|e| io_err(&pid_path, e))?;
    Ok(pid)
}

/// Stop (tolerating a daemon that is not running) then start.
pub fn restart(cwd: &Path) -> Result<u32, DaemonError> {
    match stop(cwd) {
        Ok(_) | Err(DaemonError::NotRunning { .. }) => {}
        Err(err) => return Err(err),
    }
    start(cwd)
}

/// Report daemon state as a JSON payload.
pub fn status(cwd: &Path) -> Result<Value, DaemonError> {
    let config = Config::load(&config_path_at(cwd))?;
    let pid_path = config.pid_path();
    let pid = read_live_pid(&pid_path)?;

    Ok(json!({
        "running": pid.is_some(),
        "pid": pid,
        "pid_file": pid_path.display().to_string(),
        "log_file": config.log_path().display().to_string(),
        "interval_mins": config.backup_interval_mins,
        "backups": config.backups.len(),
    }))
}

// ---------------------------------------------------------------------------
// Pid file helpers
// ---------------------------------------------------------------------------

/// Parse the pid file. `Ok(None)` when it does not exist.
fn read_pid(pid_path: &Path) -> Result<Option<u32>, DaemonError> {
    if !pid_path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(pid_path).map_err(|e| io_err(pid_path, e))?;
    contents
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| DaemonError::InvalidPidFile {
            path: pid_path.to_path_buf(),
        })
}

/// Read the pid file and probe the process. A pid file pointing at a dead
/// process is stale (machine rebooted, daemon killed -9): remove it and
/// report not-running.
fn read_live_pid(pid_path: &Path) -> Result<Option<u32>, DaemonError> {
    let Some(pid) = read_pid(pid_path)? else {
        return Ok(None);
    };

    if is_alive(pid)? {
        return Ok(Some(pid));
    }

    tracing::warn!(path = %pid_path.display(), pid, "removing stale pid file");
    fs::remove_file(pid_path).map_err(|e| io_err(pid_path, e))?;
    Ok(None)
}

fn write_pid(pid_path: &Path, pid: u32) -> Result<(), DaemonError> {
    fs::write(pid_path, format!("{pid}\n")).map_err(|e| io_err(pid_path, e))
}

/// `kill -0 <pid>` — exit 0 iff the process exists and is signallable.
fn is_alive(pid: u32) -> Result<bool, DaemonError> {
    let status = Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(Stdio::null())
        .status()
        .map_err(|e| io_err("kill", e))?;
    Ok(status.success())
}

fn signal(pid: u32, sig: &str) -> Result<(), DaemonError> {
    let output = Command::new("kill")
        .args([sig, &pid.to_string()])
        .output()
        .map_err(|e| io_err("kill", e))?;

    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(DaemonError::Signal(format!(
        "kill {sig} {pid} failed (status {}): {stderr}",
        output.status
    )))
}

fn open_log(log_path: &Path) -> Result<File, DaemonError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| io_err(log_path, e))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) {
        let yaml = format!("path: {}\n", dir.path().display());
        fs::write(config_path_at(dir.path()), yaml).expect("write config");
    }

    #[test]
    fn read_pid_missing_file_is_none() {
        let dir = TempDir::new().expect("tempdir");
        let pid = read_pid(&dir.path().join("backupd.pid")).expect("read");
        assert_eq!(pid, None);
    }

    #[test]
    fn read_pid_parses_trimmed_number() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("backupd.pid");
        fs::write(&path, "12345\n").expect("write");
        assert_eq!(read_pid(&path).expect("read"), Some(12345));
    }

    #[test]
    fn read_pid_rejects_garbage() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("backupd.pid");
        fs::write(&path, "not-a-pid\n").expect("write");
        let err = read_pid(&path).unwrap_err();
        assert!(matches!(err, DaemonError::InvalidPidFile { .. }));
    }

    #[test]
    fn own_process_is_alive() {
        assert!(is_alive(std::process::id()).expect("probe"));
    }

    #[test]
    fn stale_pid_file_is_removed() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("backupd.pid");
        // Beyond the default Linux pid_max; nothing can own it.
        fs::write(&path, "4999999\n").expect("write");

        let pid = read_live_pid(&path).expect("probe");
        assert_eq!(pid, None);
        assert!(!path.exists(), "stale pid file should be cleaned up");
    }

    #[test]
    fn status_reports_not_running_without_pid_file() {
        let dir = TempDir::new().expect("tempdir");
        write_config(&dir);

        let payload = status(dir.path()).expect("status");
        assert_eq!(payload["running"], json!(false));
        assert_eq!(payload["pid"], json!(null));
        assert_eq!(payload["backups"], json!(0));
    }

    #[test]
    fn stop_without_daemon_reports_not_running() {
        let dir = TempDir::new().expect("tempdir");
        write_config(&dir);

        let err = stop(dir.path()).unwrap_err();
        assert!(matches!(err, DaemonError::NotRunning { .. }));
    }

    #[test]
    fn start_without_config_fails() {
        let dir = TempDir::new().expect("tempdir");
        let err = start(dir.path()).unwrap_err();
        assert!(matches!(err, DaemonError::Config(_)));
    }
}
