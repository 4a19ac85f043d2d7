//! Backupd — interval rsync backup daemon.
//!
//! # Usage
//!
//! ```text
//! backupd run                  (foreground service loop)
//! backupd start|stop|restart   (daemon control via pid file)
//! backupd status               (JSON state report)
//! backupd logs [--lines N]
//! ```
//!
//! The configuration is always `backupd.yaml` in the working directory.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "backupd",
    version,
    about = "Mirror configured paths with rsync at a fixed interval",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the service loop in the foreground.
    Run,

    /// Start the daemon in the background (detached, pid file written).
    Start,

    /// Stop the running daemon.
    Stop,

    /// Stop (if running) and start the daemon.
    Restart,

    /// Print daemon state as JSON.
    Status,

    /// Print recent daemon log lines.
    Logs(LogsArgs),
}

#[derive(Args, Debug)]
struct LogsArgs {
    /// Number of trailing lines to show.
    #[arg(long, default_value_t = 100)]
    lines: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run => commands::run_foreground(),
        Commands::Start => commands::start(),
        Commands::Stop => commands::stop(),
        Commands::Restart => commands::restart(),
        Commands::Status => commands::status(),
        Commands::Logs(args) => commands::logs(args.lines),
    }
}
