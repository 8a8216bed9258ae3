//! # DocPage Testkit
//!
//! Test utilities for DocPage.
//!
//! This crate provides:
//! - Sample entities and cursor projections
//! - Property-based test generators using proptest
//! - Golden pipeline vectors
//! - An in-memory store that evaluates pipelines, for walking pages end to end
//!
//! ## Usage
//!
//! ```rust
//! use docpage_testkit::prelude::*;
//!
//! let store = MemoryStore::new(runs(7));
//! let request = Pagination::new().with_limit(3);
//! let config = PaginationConfig::default();
//! let seen = walk_cursor_pages(&store, &request, &config, |run| RunCursor::from(run)).unwrap();
//! assert_eq!(seen.len(), 7);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
    pub use crate::store::*;

    pub use docpage_core::{Pagination, PaginationConfig};
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
pub use store::*;
