//! Command handlers for the `backupd` binary.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};

use backupd_core::{config_path_at, Config};
use backupd_daemon::{control, init_tracing, DaemonError, Service};

fn cwd() -> Result<PathBuf> {
    std::env::current_dir().context("could not determine working directory")
}

/// `backupd run` — the foreground service loop; also what the detached
/// child spawned by `start` executes.
pub fn run_foreground() -> Result<()> {
    let dir = cwd()?;
    let config_path = config_path_at(&dir);
    let config = Config::load(&config_path).context("cannot start without a config file")?;
    init_tracing(&config.log_level);

    // One read at startup: the service starts from the same config that
    // configured tracing. Later changes arrive via the per-cycle reload.
    let mut service = Service::with_config(config_path, config);
    service.run();
    Ok(())
}

pub fn start() -> Result<()> {
    let pid = control::start(&cwd()?).context("failed to start daemon")?;
    println!("backupd started (pid {pid})");
    Ok(())
}

pub fn stop() -> Result<()> {
    match control::stop(&cwd()?) {
        Ok(pid) => println!("backupd stopped (pid {pid})"),
        Err(DaemonError::NotRunning { .. }) => println!("backupd is not running"),
        Err(err) => return Err(err).context("failed to stop daemon"),
    }
    Ok(())
}

pub fn restart() -> Result<()> {
    let pid = control::restart(&cwd()?).context("failed to restart daemon")?;
    println!("backupd restarted (pid {pid})");
    Ok(())
}

pub fn status() -> Result<()> {
    let payload = control::status(&cwd()?).context("failed to determine daemon status")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to render status JSON")?
    );
    Ok(())
}

pub fn logs(lines: usize) -> Result<()> {
    let dir = cwd()?;
    let config = Config::load(&config_path_at(&dir)).context("failed to load configuration")?;
    print_tail(&config.log_path(), lines).context("failed to read daemon log")
}

fn print_tail(path: &std::path::Path, lines: usize) -> Result<()> {
    if !path.exists() {
        println!("log file not found: {}", path.display());
        return Ok(());
    }

    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut tail = VecDeque::<String>::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if tail.len() == lines {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    for line in tail {
        println!("{line}");
    }
    Ok(())
}
