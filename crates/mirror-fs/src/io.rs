//! Replica-side I/O operations
//!
//! Every function here acts on one absolute path and reports failures as
//! [`Error::Io`] carrying that path. Removals are idempotent: a path that is
//! already gone is reported as `Ok(false)` rather than an error.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, Result};

/// What occupies a path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Symlinks, sockets, devices. Never mirrored.
    Other,
}

impl EntryKind {
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Inspect what is at `path` without following symlinks.
///
/// Returns `Ok(None)` if nothing exists there.
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(EntryKind::from_file_type(meta.file_type()))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Read the full byte content of a file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Create a directory and any missing parents.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so the destination only ever holds the old
/// or the new bytes. Content is written as-is; no text translation happens.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let result = write_then_rename(&temp_path, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_then_rename(temp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    drop(temp_file);

    fs::rename(temp_path, path).map_err(|e| Error::io(path, e))
}

/// Remove a single file.
///
/// Returns `Ok(false)` if there was no file at `path`.
pub fn remove_file_if_present(path: &Path) -> Result<bool> {
    match entry_kind(path)? {
        Some(EntryKind::File) | Some(EntryKind::Other) => {}
        _ => return Ok(false),
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Remove a directory and everything under it.
///
/// Files are deleted first, then the emptied directories deepest first, then
/// `path` itself. Returns `Ok(false)` if no directory exists at `path`.
pub fn remove_tree(path: &Path) -> Result<bool> {
    if entry_kind(path)? != Some(EntryKind::Directory) {
        return Ok(false);
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(|e| Error::walk(path, e))?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            let file = entry.path();
            match fs::remove_file(file) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::io(file, e)),
            }
        }
    }

    // Walk order is top-down, so reversing it visits children before parents
    for dir in dirs.iter().rev() {
        match fs::remove_dir(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(dir, e)),
        }
    }

    tracing::debug!(path = %path.display(), "removed directory tree");
    Ok(true)
}
