//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Tree Mirror - Periodically make a replica directory match a source directory
///
/// Every interval the replica is brought in line with the source: missing
/// directories and files are created, changed files are rewritten, and
/// anything the source no longer has is removed. Every change is printed
/// and appended to the log file.
///
/// Examples:
///   mirror ./photos /mnt/backup/photos 5 mirror.log
///   mirror --once src dst 0 mirror.log      # single pass, no loop
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to mirror from
    pub source: PathBuf,

    /// Directory to mirror into (created if missing)
    pub replica: PathBuf,

    /// Minutes between passes; fractions allowed (e.g. 0.5)
    #[arg(value_parser = parse_interval)]
    pub interval_minutes: Duration,

    /// File that every operation is appended to
    pub log_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single pass immediately and exit
    #[arg(long)]
    pub once: bool,

    /// Rotate the log file before it reaches this many bytes (0 disables rotation)
    #[arg(long, default_value_t = 35_000)]
    pub max_log_bytes: u64,

    /// Number of rotated log files to keep (0 disables rotation)
    #[arg(long, default_value_t = 2)]
    pub log_backups: usize,
}

/// Parse a non-negative number of minutes into a [`Duration`].
pub fn parse_interval(raw: &str) -> Result<Duration, String> {
    let minutes: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of minutes"))?;
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(format!("interval must be a non-negative number, got '{raw}'"));
    }
    Duration::try_from_secs_f64(minutes * 60.0).map_err(|e| format!("interval out of range: {e}"))
}
