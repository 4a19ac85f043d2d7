//! One configured backup: a src/dst pair bound to a synchronization strategy.

use std::path::PathBuf;

use backupd_core::BackupEntry;

use crate::synchronizer::{RsyncSynchronizer, Synchronizer};

/// A source→destination pair with exactly one owned [`Synchronizer`].
///
/// Backups are rebuilt from configuration on every service cycle; no
/// identity persists across reloads. Synchronizers are never shared between
/// backups.
pub struct Backup {
    src: PathBuf,
    dst: PathBuf,
    synchronizer: Box<dyn Synchronizer>,
}

impl Backup {
    /// Build a backup from its configuration entry, falling back to the
    /// default rsync option string when the entry does not set one.
    pub fn from_entry(entry: &BackupEntry) -> Self {
        let synchronizer = match &entry.rsync_options {
            Some(options) => RsyncSynchronizer::with_options(options.clone()),
            None => RsyncSynchronizer::default(),
        };
        Self::with_synchronizer(entry.src.clone(), entry.dst.clone(), Box::new(synchronizer))
    }

    /// Bind a pair to an arbitrary strategy (alternative tools, test doubles).
    pub fn with_synchronizer(
        src: PathBuf,
        dst: PathBuf,
        synchronizer: Box<dyn Synchronizer>,
    ) -> Self {
        Self {
            src,
            dst,
            synchronizer,
        }
    }

    pub fn src(&self) -> &std::path::Path {
        &self.src
    }

    pub fn dst(&self) -> &std::path::Path {
        &self.dst
    }

    /// Perform the backup now. Delegates to the owned synchronizer and
    /// returns its result unchanged — no retry, no path validation.
    pub fn do_backup_now(&self) -> bool {
        self.synchronizer.sync(&self.src, &self.dst)
    }
}
