//! External-tool-backed synchronization.
//!
//! A [`Synchronizer`] makes a destination path match a source path. The one
//! concrete implementation shells out to `rsync` and reads nothing but the
//! exit code; every ordinary failure mode (non-zero exit, binary missing)
//! is reported through the boolean return, never as an error, so a bad
//! backup can never take the service loop down with it.

use std::path::Path;
use std::process::Command;

/// Capability to make `dst` match `src`.
///
/// Returns `true` on success, `false` on failure. Implementations must not
/// panic or escalate ordinary failures; they log a warning naming the
/// affected pair instead. Instances are stateless between calls and safe to
/// reuse for many independent pairs.
pub trait Synchronizer {
    fn sync(&self, src: &Path, dst: &Path) -> bool;
}

/// A [`Synchronizer`] that invokes the system `rsync` binary.
///
/// Command name and option string are fixed at construction. The option
/// string is passed as a single argv element (`rsync <options> <src> <dst>`),
/// so multi-flag strings use rsync's combined short form (e.g. `-av`).
/// No timeout is imposed; a hung rsync blocks the calling cycle.
#[derive(Debug, Clone)]
pub struct RsyncSynchronizer {
    cmd: String,
    options: String,
}

impl Default for RsyncSynchronizer {
    fn default() -> Self {
        Self::with_options(backupd_core::DEFAULT_RSYNC_OPTIONS)
    }
}

impl RsyncSynchronizer {
    pub fn with_options(options: impl Into<String>) -> Self {
        Self {
            cmd: "rsync".to_string(),
            options: options.into(),
        }
    }
}

impl Synchronizer for RsyncSynchronizer {
    fn sync(&self, src: &Path, dst: &Path) -> bool {
        tracing::debug!(
            cmd = %self.cmd,
            options = %self.options,
            src = %src.display(),
            dst = %dst.display(),
            "invoking sync tool",
        );

        let status = Command::new(&self.cmd)
            .arg(&self.options)
            .arg(src)
            .arg(dst)
            .status();

        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!(
                    src = %src.display(),
                    dst = %dst.display(),
                    code = status.code().unwrap_or(-1),
                    "failed to sync",
                );
                false
            }
            // Tool not found / not executable counts as a sync failure, not
            // a fault: the service keeps running and retries next interval.
            Err(err) => {
                tracing::warn!(
                    src = %src.display(),
                    dst = %dst.display(),
                    error = %err,
                    "failed to launch sync tool",
                );
                false
            }
        }
    }
}
