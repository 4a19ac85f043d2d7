//! Backupd daemon runtime: reload-and-run service loop plus pid-file
//! process lifecycle (start/stop/status) and log rotation.

pub mod control;
mod error;
pub mod log_rotation;
pub mod service;

pub use error::DaemonError;
pub use service::{init_tracing, Service};
