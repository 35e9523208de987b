//! Reconciler implementation
//!
//! A pass walks the source tree top-down, makes each directory and file in
//! the replica match, and then removes whatever the index still lists but
//! the walk never saw. The [`StateIndex`] is updated after every mutation,
//! so an aborted pass leaves it consistent with what actually happened on
//! disk and the next pass picks up from there.

mod report;

pub use report::PassReport;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mirror_fs::{ContentDigest, EntryKind, io, walk_tree};

use crate::index::{Observed, StateIndex};
use crate::sink::LogSink;
use crate::{Error, Result};

/// Mirrors one source tree onto one replica tree.
pub struct Reconciler<S> {
    source_root: PathBuf,
    replica_root: PathBuf,
    index: StateIndex,
    sink: S,
}

/// State private to one pass.
#[derive(Default)]
struct Pass {
    observed: Observed,
    report: PassReport,
}

impl<S: LogSink> Reconciler<S> {
    /// Create a reconciler.
    ///
    /// `index` must describe `replica_root`, normally via
    /// [`StateIndex::scan`].
    pub fn new(
        source_root: impl Into<PathBuf>,
        replica_root: impl Into<PathBuf>,
        index: StateIndex,
        sink: S,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            replica_root: replica_root.into(),
            index,
            sink,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn replica_root(&self) -> &Path {
        &self.replica_root
    }

    pub fn index(&self) -> &StateIndex {
        &self.index
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (StateIndex, S) {
        (self.index, self.sink)
    }

    /// Run one full pass: directories and files, then removals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] if the source root is missing or
    /// not a directory, or if the source walk or a source read fails;
    /// [`Error::ConflictResolution`] if an entry of the wrong kind cannot be
    /// cleared; and [`Error::Replica`] for any other replica write or removal
    /// failure. The pass stops at the first error; nothing
    /// is removed unless the whole source walk succeeded.
    pub fn run_once(&mut self) -> Result<PassReport> {
        let mut pass = Pass::default();
        let source_root = self.source_root.clone();

        // A non-directory root walks as empty and would wipe the replica
        let root_error = match io::entry_kind(&source_root).map_err(Error::source_unreadable)? {
            Some(EntryKind::Directory) => None,
            Some(_) => Some(ErrorKind::NotADirectory),
            None => Some(ErrorKind::NotFound),
        };
        if let Some(kind) = root_error {
            let e = mirror_fs::Error::io(source_root, std::io::Error::from(kind));
            return Err(Error::source_unreadable(e));
        }

        for entry in walk_tree(&source_root) {
            let entry = entry.map_err(Error::source_unreadable)?;
            match entry.kind {
                EntryKind::Directory => self.ensure_dir(&entry.relative, &mut pass)?,
                EntryKind::File => self.sync_file(&entry.relative, &mut pass)?,
                EntryKind::Other => {
                    tracing::debug!(
                        path = %entry.relative.display(),
                        "skipping special entry in source"
                    );
                }
            }
        }

        self.remove_unobserved(&mut pass)?;
        self.index.retain_observed(pass.observed);

        tracing::info!(report = %pass.report, "pass complete");
        Ok(pass.report)
    }

    fn ensure_dir(&mut self, rel: &Path, pass: &mut Pass) -> Result<()> {
        let target = self.replica_root.join(rel);

        match io::entry_kind(&target).map_err(Error::replica)? {
            Some(EntryKind::Directory) => {}
            Some(EntryKind::File) | Some(EntryKind::Other) => {
                // Leftover from when the source had a file here
                self.remove_file(rel, &mut pass.report).map_err(|e| Error::conflict(&target, e))?;
                self.create_dir(rel, &target, &mut pass.report)?;
            }
            None => self.create_dir(rel, &target, &mut pass.report)?,
        }

        pass.observed.dirs.insert(rel.to_path_buf());
        Ok(())
    }

    fn create_dir(&mut self, rel: &Path, target: &Path, report: &mut PassReport) -> Result<()> {
        io::create_dir_all(target).map_err(Error::replica)?;
        self.index.record_dir_created(rel);
        self.sink.record(&format!("Created directory {}", target.display()));
        report.dirs_created += 1;
        Ok(())
    }

    fn sync_file(&mut self, rel: &Path, pass: &mut Pass) -> Result<()> {
        let source_file = self.source_root.join(rel);
        let target = self.replica_root.join(rel);

        let content = io::read_bytes(&source_file).map_err(Error::source_unreadable)?;
        let digest = ContentDigest::of(&content);

        let verb = match io::entry_kind(&target).map_err(Error::replica)? {
            Some(EntryKind::File) if self.index.digest_matches(rel, &digest) => {
                tracing::debug!(path = %rel.display(), %digest, "unchanged");
                pass.report.files_unchanged += 1;
                pass.observed.files.insert(rel.to_path_buf());
                return Ok(());
            }
            Some(EntryKind::File) => "Updated",
            Some(EntryKind::Directory) => {
                // Leftover from when the source had a directory here
                self.remove_dir(rel, &mut pass.report).map_err(|e| Error::conflict(&target, e))?;
                "Copied"
            }
            // Rename replaces a symlink rather than writing through it
            Some(EntryKind::Other) | None => "Copied",
        };

        io::write_atomic(&target, &content).map_err(Error::replica)?;
        self.index.record_file_written(rel, digest);
        self.sink.record(&format!("{} file {}", verb, target.display()));
        if verb == "Updated" {
            pass.report.files_updated += 1;
        } else {
            pass.report.files_copied += 1;
        }

        pass.observed.files.insert(rel.to_path_buf());
        Ok(())
    }

    fn remove_unobserved(&mut self, pass: &mut Pass) -> Result<()> {
        // Parents sort before children; a child already taken out with its
        // parent is a no-op.
        for rel in self.index.stale_dirs(&pass.observed) {
            self.remove_dir(&rel, &mut pass.report).map_err(Error::replica)?;
        }

        // Computed after directory removal so descendants are already forgotten
        for rel in self.index.stale_files(&pass.observed) {
            self.remove_file(&rel, &mut pass.report).map_err(Error::replica)?;
        }
        Ok(())
    }

    /// Remove a replica directory and everything under it. No-op if there is
    /// no directory at `rel`.
    fn remove_dir(&mut self, rel: &Path, report: &mut PassReport) -> mirror_fs::Result<bool> {
        let target = self.replica_root.join(rel);
        let removed = io::remove_tree(&target)?;
        self.index.forget_tree(rel);
        if removed {
            self.sink.record(&format!(
                "Removed directory {} and its contents",
                target.display()
            ));
            report.dirs_removed += 1;
        }
        Ok(removed)
    }

    /// Remove a replica file. No-op if there is no file at `rel`.
    fn remove_file(&mut self, rel: &Path, report: &mut PassReport) -> mirror_fs::Result<bool> {
        let target = self.replica_root.join(rel);
        let removed = io::remove_file_if_present(&target)?;
        self.index.forget_file(rel);
        if removed {
            self.sink.record(&format!("Removed file {}", target.display()));
            report.files_removed += 1;
        }
        Ok(removed)
    }
}
