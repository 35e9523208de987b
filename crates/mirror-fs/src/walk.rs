//! Ordered, top-down tree walking with root-relative paths

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::io::EntryKind;
use crate::{Error, Result};

/// One entry found under a walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the walk root. Never empty.
    pub relative: PathBuf,
    pub kind: EntryKind,
}

/// Walk everything below `root`, excluding `root` itself.
///
/// Entries come top-down: a directory is always yielded before anything it
/// contains. Siblings are sorted by file name so passes are deterministic.
/// Symlinks are reported as [`EntryKind::Other`] and never descended into.
///
/// A missing or unreadable `root` surfaces as the first item's error.
pub fn walk_tree(root: &Path) -> impl Iterator<Item = Result<TreeEntry>> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| {
            let entry = entry.map_err(|e| Error::walk(root, e))?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
            Ok(TreeEntry {
                relative,
                kind: EntryKind::from_file_type(entry.file_type()),
            })
        })
}
