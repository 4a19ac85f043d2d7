//! Size-based rotation for the daemon log file.
//!
//! The daemon writes a single log file (`backupd.log`, stdout/stderr of the
//! detached process). Once per cycle the live file is checked and, above
//! 10 MiB, copied to `backupd.log.old` (replacing any previous copy) and
//! truncated in place. The daemon keeps an open descriptor to the live
//! file, so rotation must never rename it: the descriptor would follow the
//! renamed inode and all later output would land in the `.old` copy.
//! Copy-then-truncate leaves the held descriptor appending to the live
//! path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum log file size before rotation (10 MiB).
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// `backupd.log` → `backupd.log.old`
pub fn old_log_path(log_path: &Path) -> PathBuf {
    let name = log_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("backupd.log");
    log_path.with_file_name(format!("{name}.old"))
}

/// Rotate `log_path` if its size exceeds `max_bytes`.
///
/// Returns `true` if rotation occurred, `false` if the file was under the
/// threshold or did not exist yet.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    if size < max_bytes {
        return Ok(false);
    }

    fs::copy(log_path, old_log_path(log_path))?;

    // Truncate via the path; the daemon's append-mode stdio descriptor
    // keeps writing to this same file.
    fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(log_path)?;

    Ok(true)
}

/// Rotation wrapper for the service loop: failures are warnings, never fatal.
pub fn rotate(log_path: &Path) {
    match rotate_if_needed(log_path, MAX_LOG_BYTES) {
        Ok(true) => tracing::info!(path = %log_path.display(), "log file rotated"),
        Ok(false) => {}
        Err(err) => {
            tracing::warn!(path = %log_path.display(), error = %err, "log rotation failed")
        }
    }
}
