//! Per-pass counters

use std::fmt;

/// What one reconciliation pass did to the replica.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub dirs_created: usize,
    pub files_copied: usize,
    pub files_updated: usize,
    /// Files whose digest already matched; not written.
    pub files_unchanged: usize,
    pub files_removed: usize,
    pub dirs_removed: usize,
}

impl PassReport {
    /// Number of filesystem mutations performed.
    pub fn mutations(&self) -> usize {
        self.dirs_created
            + self.files_copied
            + self.files_updated
            + self.files_removed
            + self.dirs_removed
    }

    /// True when the replica was already in sync.
    pub fn is_noop(&self) -> bool {
        self.mutations() == 0
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dirs created, {} files copied, {} updated, {} unchanged, {} files removed, {} dirs removed",
            self.dirs_created,
            self.files_copied,
            self.files_updated,
            self.files_unchanged,
            self.files_removed,
            self.dirs_removed
        )
    }
}
