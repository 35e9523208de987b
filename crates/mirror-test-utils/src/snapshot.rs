//! Tree snapshots for comparing a replica against its source.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

/// What a snapshot records for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEntry {
    Dir,
    File(Vec<u8>),
}

/// Every path below a root (forward-slash separated) with its kind and bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot(pub BTreeMap<String, SnapshotEntry>);

impl TreeSnapshot {
    /// Capture everything below `root`, excluding `root` itself.
    ///
    /// # Panics
    /// Panics if the tree cannot be read.
    pub fn capture(root: &Path) -> Self {
        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.unwrap_or_else(|e| panic!("TreeSnapshot::capture: {e}"));
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let value = if entry.file_type().is_dir() {
                SnapshotEntry::Dir
            } else {
                SnapshotEntry::File(std::fs::read(entry.path()).unwrap())
            };
            entries.insert(rel, value);
        }
        Self(entries)
    }

    /// Relative paths only.
    pub fn paths(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Assert that two trees hold the same paths, kinds and file bytes.
///
/// # Panics
/// Panics with a diff of the two snapshots if they differ.
pub fn assert_trees_equal(expected: &Path, actual: &Path) {
    let expected = TreeSnapshot::capture(expected);
    let actual = TreeSnapshot::capture(actual);
    pretty_assertions::assert_eq!(expected, actual);
}
