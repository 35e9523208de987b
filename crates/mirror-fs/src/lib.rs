//! Filesystem primitives for Tree Mirror
//!
//! Provides content digests, ordered tree walking and the replica-side I/O
//! operations the reconciler is built from.

pub mod digest;
pub mod error;
pub mod io;
pub mod walk;

pub use digest::ContentDigest;
pub use error::{Error, Result};
pub use io::EntryKind;
pub use walk::{TreeEntry, walk_tree};
