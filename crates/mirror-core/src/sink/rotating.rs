//! Size-rotated, timestamped log file

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::LogSink;

/// When to roll a log file over and how many old segments to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Roll over before a write would take the file to this size. 0 disables rotation.
    pub max_bytes: u64,
    /// Rolled segments kept as `<log>.1` (newest) through `<log>.<backups>`. 0 disables rotation.
    pub backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 35_000,
            backups: 2,
        }
    }
}

impl RotationPolicy {
    fn enabled(&self) -> bool {
        self.max_bytes > 0 && self.backups > 0
    }
}

/// Render one log line: `YYYY-MM-DD HH:MM:SS <message>\n`.
pub fn format_line(at: DateTime<Utc>, message: &str) -> String {
    format!("{} {}\n", at.format("%Y-%m-%d %H:%M:%S"), message)
}

/// Appends timestamped lines to a file, rotating it by size.
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    size: u64,
}

impl RotatingFileSink {
    /// Open (or create) the log file for appending.
    ///
    /// Missing parent directories are created.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> mirror_fs::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            mirror_fs::io::create_dir_all(parent)?;
        }
        let file = open_append(&path).map_err(|e| mirror_fs::Error::io(&path, e))?;
        let size = file
            .metadata()
            .map_err(|e| mirror_fs::Error::io(&path, e))?
            .len();

        Ok(Self {
            path,
            policy,
            file: Some(file),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Path of the `n`th rolled segment, e.g. `sync.log.2`.
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Record a message stamped with the given time.
    pub fn record_at(&mut self, at: DateTime<Utc>, message: &str) -> io::Result<()> {
        let line = format_line(at, message);
        if self.should_roll_over(line.len() as u64) {
            self.roll_over()?;
        }

        if self.file.is_none() {
            let file = open_append(&self.path)?;
            self.size = file.metadata()?.len();
            self.file = Some(file);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(line.as_bytes())?;
            file.flush()?;
            self.size += line.len() as u64;
        }
        Ok(())
    }

    fn should_roll_over(&self, incoming: u64) -> bool {
        self.policy.enabled() && self.size > 0 && self.size + incoming >= self.policy.max_bytes
    }

    fn roll_over(&mut self) -> io::Result<()> {
        // Close before renaming; required on Windows
        self.file = None;

        for n in (1..self.policy.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                let to = self.backup_path(n + 1);
                remove_if_exists(&to)?;
                fs::rename(&from, &to)?;
            }
        }

        let newest = self.backup_path(1);
        remove_if_exists(&newest)?;
        if self.path.exists() {
            fs::rename(&self.path, &newest)?;
        }

        self.file = Some(open_append(&self.path)?);
        self.size = 0;
        tracing::debug!(path = %self.path.display(), "rotated log file");
        Ok(())
    }
}

impl LogSink for RotatingFileSink {
    fn record(&mut self, message: &str) {
        if let Err(e) = self.record_at(Utc::now(), message) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write log line");
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
