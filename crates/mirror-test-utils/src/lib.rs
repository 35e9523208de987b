//! Shared test utilities for the tree-mirror workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only; it is never published.
//!
//! # Modules
//!
//! - [`tree`] - [`TestTree`] builder for temporary directory trees
//! - [`snapshot`] - relative-path and content snapshots for comparing trees

pub mod snapshot;
pub mod tree;

pub use snapshot::{TreeSnapshot, assert_trees_equal};
pub use tree::TestTree;
