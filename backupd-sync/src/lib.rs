//! Backupd sync library — the [`Synchronizer`] capability and the
//! [`Backup`] binding between a configured src/dst pair and its strategy.

pub mod backup;
pub mod synchronizer;

pub use backup::Backup;
pub use synchronizer::{RsyncSynchronizer, Synchronizer};
