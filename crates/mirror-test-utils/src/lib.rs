//! Shared test utilities for the folder-mirror workspace.
//!
//! This crate provides a standard source/replica fixture so crate test suites
//! do not each grow their own. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder and tree snapshot helpers

pub mod tree;

pub use tree::{TestTree, mtime, snapshot};
