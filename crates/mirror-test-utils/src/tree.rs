//! [`TestTree`] builder for source and replica test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// A temporary directory tree with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let source = TestTree::new();
/// source.write("a/x.txt", "hello");
/// source.assert_file_contains("a/x.txt", "hello");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a file, creating parent directories as needed.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let full = self.path(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("TestTree::write: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&full, content)
            .unwrap_or_else(|e| panic!("TestTree::write: failed to write {}: {e}", full.display()));
    }

    /// Create a directory and any missing parents.
    pub fn mkdir(&self, rel: &str) {
        let full = self.path(rel);
        fs::create_dir_all(&full).unwrap_or_else(|e| {
            panic!("TestTree::mkdir: failed to create {}: {e}", full.display())
        });
    }

    /// Remove a file or a whole directory.
    pub fn remove(&self, rel: &str) {
        let full = self.path(rel);
        let result = if full.is_dir() {
            fs::remove_dir_all(&full)
        } else {
            fs::remove_file(&full)
        };
        result.unwrap_or_else(|e| {
            panic!("TestTree::remove: failed to remove {}: {e}", full.display())
        });
    }

    /// Read a file's bytes.
    pub fn read(&self, rel: &str) -> Vec<u8> {
        let full = self.path(rel);
        fs::read(&full).unwrap_or_else(|e| panic!("Could not read file {}: {e}", full.display()))
    }

    /// Modification time of a file.
    pub fn modified(&self, rel: &str) -> SystemTime {
        let full = self.path(rel);
        fs::metadata(&full)
            .and_then(|m| m.modified())
            .unwrap_or_else(|e| panic!("Could not stat {}: {e}", full.display()))
    }

    /// Assert that `rel` exists and is a directory.
    pub fn assert_dir_exists(&self, rel: &str) {
        let full = self.path(rel);
        assert!(full.is_dir(), "Expected directory to exist: {}", full.display());
    }

    /// Assert that `rel` exists and is a regular file.
    pub fn assert_file_exists(&self, rel: &str) {
        let full = self.path(rel);
        assert!(full.is_file(), "Expected file to exist: {}", full.display());
    }

    /// Assert that nothing exists at `rel`.
    pub fn assert_not_exists(&self, rel: &str) {
        let full = self.path(rel);
        assert!(
            fs::symlink_metadata(&full).is_err(),
            "Expected path NOT to exist: {}",
            full.display()
        );
    }

    /// Assert that the file at `rel` holds exactly `content`.
    pub fn assert_file_contains(&self, rel: &str, content: impl AsRef<[u8]>) {
        let actual = self.read(rel);
        assert_eq!(
            actual,
            content.as_ref(),
            "File {} does not hold the expected bytes.\nExpected: {}\nActual: {}",
            rel,
            String::from_utf8_lossy(content.as_ref()),
            String::from_utf8_lossy(&actual)
        );
    }
}
