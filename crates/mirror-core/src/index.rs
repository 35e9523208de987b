//! In-memory index of the replica tree
//!
//! [`StateIndex`] records which directories and files the replica holds and
//! the content digest of each file. It is built once by [`StateIndex::scan`]
//! and then kept in step with the filesystem by the reconciler, so a pass
//! never has to re-read replica files to know their content.
//!
//! Paths are always relative to the replica root. Files are stored as a
//! single path → digest map, so a known file without a digest cannot exist.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use mirror_fs::{ContentDigest, EntryKind, walk_tree};

use crate::{Error, Result};

/// Last-known state of the replica tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateIndex {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, ContentDigest>,
}

/// Paths confirmed present in the source during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observed {
    pub dirs: BTreeSet<PathBuf>,
    pub files: BTreeSet<PathBuf>,
}

impl Observed {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateIndex {
    /// An index with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the current contents of `replica_root`.
    ///
    /// Every directory under the root is recorded, and every file is read
    /// once to compute its digest. Symlinks and other special entries are
    /// left out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scan`] if the root or any entry under it cannot be
    /// read. Without a baseline the first pass would treat every replica
    /// entry as stale, so callers should treat this as fatal.
    pub fn scan(replica_root: impl AsRef<Path>) -> Result<Self> {
        let root = replica_root.as_ref();
        let scan_err = |source: mirror_fs::Error| Error::Scan {
            path: root.to_path_buf(),
            source,
        };

        let mut index = Self::new();
        for entry in walk_tree(root) {
            let entry = entry.map_err(scan_err)?;
            match entry.kind {
                EntryKind::Directory => index.record_dir_created(entry.relative),
                EntryKind::File => {
                    let digest = ContentDigest::of_file(&root.join(&entry.relative))
                        .map_err(scan_err)?;
                    index.record_file_written(entry.relative, digest);
                }
                EntryKind::Other => {
                    tracing::debug!(
                        path = %entry.relative.display(),
                        "skipping special entry in replica scan"
                    );
                }
            }
        }

        tracing::info!(
            root = %root.display(),
            dirs = index.dirs.len(),
            files = index.files.len(),
            "scanned replica"
        );
        Ok(index)
    }

    /// Record that a directory now exists at `path`.
    pub fn record_dir_created(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.files.remove(&path);
        self.dirs.insert(path);
    }

    /// Record that `path` now holds a file with the given digest.
    pub fn record_file_written(&mut self, path: impl Into<PathBuf>, digest: ContentDigest) {
        let path = path.into();
        self.dirs.remove(&path);
        self.files.insert(path, digest);
    }

    pub fn forget_dir(&mut self, path: &Path) {
        self.dirs.remove(path);
    }

    pub fn forget_file(&mut self, path: &Path) {
        self.files.remove(path);
    }

    /// Forget `path` and every directory and file recorded beneath it.
    pub fn forget_tree(&mut self, path: &Path) {
        self.dirs.retain(|p| !p.starts_with(path));
        self.files.retain(|p, _| !p.starts_with(path));
    }

    /// Whether `path` is a known file whose recorded digest is `digest`.
    pub fn digest_matches(&self, path: &Path, digest: &ContentDigest) -> bool {
        self.files.get(path) == Some(digest)
    }

    pub fn digest_of(&self, path: &Path) -> Option<&ContentDigest> {
        self.files.get(path)
    }

    pub fn contains_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Known directories, in path order.
    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    /// Known files, in path order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Known directories the pass did not observe.
    pub(crate) fn stale_dirs(&self, observed: &Observed) -> Vec<PathBuf> {
        self.dirs.difference(&observed.dirs).cloned().collect()
    }

    /// Known files the pass did not observe.
    pub(crate) fn stale_files(&self, observed: &Observed) -> Vec<PathBuf> {
        self.files
            .keys()
            .filter(|p| !observed.files.contains(*p))
            .cloned()
            .collect()
    }

    /// Make the observed set the known set for the next pass.
    ///
    /// Directories are replaced outright. Files keep their recorded digest;
    /// every observed file was recorded while the pass synced it.
    pub fn retain_observed(&mut self, observed: Observed) {
        self.files.retain(|p, _| observed.files.contains(p));
        self.dirs = observed.dirs;
    }

    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn digest(s: &str) -> ContentDigest {
        ContentDigest::of(s.as_bytes())
    }

    #[test]
    fn scan_records_dirs_and_file_digests() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/x.txt"), "hello").unwrap();
        fs::write(dir.path().join("top.txt"), "world").unwrap();

        let index = StateIndex::scan(dir.path()).unwrap();

        assert!(index.contains_dir(Path::new("a")));
        assert!(index.contains_dir(Path::new("a/b")));
        assert!(index.digest_matches(Path::new("a/x.txt"), &digest("hello")));
        assert!(index.digest_matches(Path::new("top.txt"), &digest("world")));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn scan_of_empty_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StateIndex::scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn scan_of_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = StateIndex::scan(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Scan { .. }));
    }

    #[test]
    fn digest_matches_is_false_for_unknown_paths() {
        let index = StateIndex::new();
        assert!(!index.digest_matches(Path::new("nope.txt"), &digest("x")));
    }

    #[test]
    fn recording_a_kind_evicts_the_other() {
        let mut index = StateIndex::new();
        index.record_file_written("p", digest("x"));
        index.record_dir_created("p");
        assert!(index.contains_dir(Path::new("p")));
        assert!(!index.contains_file(Path::new("p")));

        index.record_file_written("p", digest("y"));
        assert!(!index.contains_dir(Path::new("p")));
        assert_eq!(index.digest_of(Path::new("p")), Some(&digest("y")));
    }

    #[test]
    fn forget_dir_leaves_descendants_and_files() {
        let mut index = StateIndex::new();
        index.record_dir_created("a");
        index.record_dir_created("a/b");
        index.record_file_written("a/f", digest("f"));

        index.forget_dir(Path::new("a"));
        index.forget_dir(Path::new("never-known"));

        assert!(!index.contains_dir(Path::new("a")));
        assert!(index.contains_dir(Path::new("a/b")));
        assert!(index.contains_file(Path::new("a/f")));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn forget_tree_drops_descendants_only() {
        let mut index = StateIndex::new();
        index.record_dir_created("a");
        index.record_dir_created("a/b");
        index.record_file_written("a/b/f", digest("f"));
        index.record_dir_created("ab");
        index.record_file_written("ab/g", digest("g"));

        index.forget_tree(Path::new("a"));

        assert_eq!(index.dirs().collect::<Vec<_>>(), vec![Path::new("ab")]);
        assert_eq!(index.files().collect::<Vec<_>>(), vec![Path::new("ab/g")]);
    }

    #[test]
    fn retain_observed_replaces_known_sets() {
        let mut index = StateIndex::new();
        index.record_dir_created("keep");
        index.record_dir_created("drop");
        index.record_file_written("keep/f", digest("f"));
        index.record_file_written("gone", digest("g"));

        let mut observed = Observed::new();
        observed.dirs.insert(PathBuf::from("keep"));
        observed.files.insert(PathBuf::from("keep/f"));

        assert_eq!(index.stale_dirs(&observed), vec![PathBuf::from("drop")]);
        assert_eq!(index.stale_files(&observed), vec![PathBuf::from("gone")]);

        index.retain_observed(observed);

        assert_eq!(index.dirs().collect::<Vec<_>>(), vec![Path::new("keep")]);
        assert!(index.digest_matches(Path::new("keep/f"), &digest("f")));
        assert!(!index.contains_file(Path::new("gone")));
    }
}
