//! Validated runtime configuration
//!
//! Turns parsed arguments into absolute, checked paths before anything
//! touches the replica.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mirror_core::RotationPolicy;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Everything a mirroring run needs, held in memory for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub interval: Duration,
    pub log_file: PathBuf,
    pub rotation: RotationPolicy,
    pub once: bool,
}

impl MirrorConfig {
    /// Validate arguments and resolve paths.
    ///
    /// The replica root is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a user error if the source is not an existing directory, the
    /// replica path is taken by a file, the two trees overlap, or the log
    /// file would live inside the replica.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let source = dunce::canonicalize(&cli.source).map_err(|e| {
            CliError::user(format!(
                "Source directory {} is not accessible: {e}",
                cli.source.display()
            ))
        })?;
        if !source.is_dir() {
            return Err(CliError::user(format!(
                "Source {} is not a directory",
                source.display()
            )));
        }

        if !cli.replica.exists() {
            mirror_fs::io::create_dir_all(&cli.replica)?;
            tracing::info!(path = %cli.replica.display(), "created replica root");
        }
        let replica = dunce::canonicalize(&cli.replica)?;
        if !replica.is_dir() {
            return Err(CliError::user(format!(
                "Replica {} is not a directory",
                replica.display()
            )));
        }

        if replica.starts_with(&source) || source.starts_with(&replica) {
            return Err(CliError::user(format!(
                "Source {} and replica {} must not overlap",
                source.display(),
                replica.display()
            )));
        }

        let log_file = absolute_log_path(&cli.log_file)?;
        if log_file.starts_with(&replica) {
            return Err(CliError::user(format!(
                "Log file {} must not live inside the replica; it would be removed every pass",
                log_file.display()
            )));
        }
        if log_file.starts_with(&source) {
            tracing::warn!(
                path = %log_file.display(),
                "log file is inside the source and will be mirrored"
            );
        }

        Ok(Self {
            source,
            replica,
            interval: cli.interval_minutes,
            log_file,
            rotation: RotationPolicy {
                max_bytes: cli.max_log_bytes,
                backups: cli.log_backups,
            },
            once: cli.once,
        })
    }
}

/// Resolve the log file against its (possibly not yet existing) parent.
fn absolute_log_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::user(format!("Log file {} has no file name", path.display())))?;
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let parent = if parent.exists() {
        dunce::canonicalize(&parent)?
    } else {
        std::path::absolute(&parent)?
    };
    Ok(parent.join(file_name))
}
