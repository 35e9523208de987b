//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning or reconciling
///
/// Every variant except [`Error::Scan`] aborts only the current pass; the next
/// pass retries from whatever state the replica was left in.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The replica could not be scanned to build the initial index
    #[error("Failed to scan replica at {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// The source root, or something under it, vanished or became unreadable
    #[error("Source unreadable at {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// An entry of the wrong kind blocks the path and could not be removed
    #[error("Could not remove conflicting entry at {path}: {source}")]
    ConflictResolution {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// Any other failure writing to or removing from the replica
    #[error("Replica operation failed at {path}: {source}")]
    Replica {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },
}

impl Error {
    pub fn source_unreadable(source: mirror_fs::Error) -> Self {
        Self::SourceUnreadable {
            path: source.path().to_path_buf(),
            source,
        }
    }

    pub fn conflict(path: impl Into<PathBuf>, source: mirror_fs::Error) -> Self {
        Self::ConflictResolution {
            path: path.into(),
            source,
        }
    }

    pub fn replica(source: mirror_fs::Error) -> Self {
        Self::Replica {
            path: source.path().to_path_buf(),
            source,
        }
    }

    /// The path the failure is attributed to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Scan { path, .. }
            | Self::SourceUnreadable { path, .. }
            | Self::ConflictResolution { path, .. }
            | Self::Replica { path, .. } => path,
        }
    }
}
