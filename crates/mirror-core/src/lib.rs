//! Reconciliation engine for Tree Mirror
//!
//! This crate keeps a replica directory tree identical to a source tree:
//!
//! - **StateIndex**: in-memory record of the replica's directories, files and
//!   content digests, built once by scanning and then updated after every
//!   mutation
//! - **Reconciler**: one pass walks the source, creates/updates what differs,
//!   and removes what the source no longer has
//! - **LogSink**: where every create/update/remove is recorded
//!
//! # Architecture
//!
//! ```text
//!     scheduler (mirror-cli)
//!              |
//!     Reconciler::run_once ---> LogSink
//!              |
//!         StateIndex
//!              |
//!          mirror-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mirror_core::{MemorySink, Reconciler, StateIndex};
//!
//! fn example() -> mirror_core::Result<()> {
//!     let index = StateIndex::scan("/data/replica")?;
//!     let mut reconciler =
//!         Reconciler::new("/data/source", "/data/replica", index, MemorySink::new());
//!     let report = reconciler.run_once()?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod index;
pub mod reconcile;
pub mod sink;

pub use error::{Error, Result};
pub use index::{Observed, StateIndex};
pub use reconcile::{PassReport, Reconciler};
pub use sink::{LogSink, MemorySink, RotatingFileSink, RotationPolicy, StdoutSink, Tee};
