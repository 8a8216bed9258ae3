//! # DocPage Core
//!
//! Keyset (cursor) and offset (page) pagination for document stores.
//!
//! This crate provides:
//! - [`Pagination`], the request a caller binds from a query string
//! - [`Sortable`] and [`extract_fields`], the ordered sortable-field view of
//!   an entity
//! - [`cursor_pipeline`] and [`page_pipeline`], which turn a request into
//!   aggregation stages (`$match`, `$sort`, `$skip`, `$limit`)
//! - [`Page`] and [`Paging`], response envelopes carrying the next cursor
//!
//! Nothing here runs queries. Callers execute the pipeline against their
//! store and encode the last row of the result as the next cursor.
//!
//! ## Example
//!
//! ```
//! use docpage_core::{cursor_pipeline, Field, Pagination, Shape, Sortable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase", default)]
//! struct RunCursor {
//!     total_distance: Option<i64>,
//!     created_at: Option<i64>,
//! }
//!
//! impl Sortable for RunCursor {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Record(vec![
//!             Field::scalar("totalDistance", self.total_distance),
//!             Field::scalar("createdAt", self.created_at),
//!         ])
//!     }
//! }
//!
//! let request = Pagination::new().with_limit(20);
//! let pipeline = cursor_pipeline(Some(&mut RunCursor::default()), &request).unwrap();
//! assert_eq!(pipeline.keys(), vec!["$sort", "$limit"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod fields;
mod page;
pub mod pipeline;
mod request;
pub mod stage;

pub use config::{PaginationConfig, DEFAULT_ORDER_BY, MAX_PAGE_SIZE};
pub use error::{PaginationError, PaginationResult};
pub use fields::{extract_fields, Field, FieldValue, Shape, Sortable, MAX_NESTING_DEPTH};
pub use page::{Page, Paging};
pub use pipeline::{
    continuation, cursor_pipeline, cursor_pipeline_with_config, page_pipeline,
    page_pipeline_with_config, sort_stage, tie_break_predicate,
};
pub use request::{OrderDirection, Pagination};
pub use stage::{CompareOp, Pipeline, Predicate, SortOrder, Stage};

pub use docpage_codec::{CodecError, CursorCodec, Document, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
