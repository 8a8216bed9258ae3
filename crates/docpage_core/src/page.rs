//! Response envelopes carrying the next cursor.

use docpage_codec::encode_cursor;
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::error::PaginationResult;
use crate::request::Pagination;

/// Paging metadata returned alongside a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Cursor of the next page, if there is one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cursors: Vec<String>,

    /// Total number of matching rows, when the caller counted them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows of this page.
    pub data: Vec<T>,

    /// Token for the following page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,

    /// Total number of matching rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> Page<T> {
    /// Wraps `rows`, deriving the next cursor from the last row.
    ///
    /// A next cursor is produced only when the page is full, i.e. when
    /// `rows.len()` reached the request's effective limit. `to_cursor` maps
    /// the row onto the value that gets encoded, usually the entity's
    /// sortable fields.
    ///
    /// # Errors
    ///
    /// Cursor encoding errors.
    pub fn from_rows_with<C, F>(
        rows: Vec<T>,
        pagination: &Pagination,
        config: &PaginationConfig,
        to_cursor: F,
    ) -> PaginationResult<Self>
    where
        C: Serialize,
        F: FnOnce(&T) -> C,
    {
        let next_cursor = match rows.last() {
            Some(last) if is_full(rows.len(), pagination, config) => {
                Some(encode_cursor(&to_cursor(last))?)
            }
            _ => None,
        };

        Ok(Self {
            data: rows,
            next_cursor,
            count: None,
        })
    }

    /// Attaches a total count.
    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Whether another page follows.
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Paging metadata for this page.
    pub fn paging(&self) -> Paging {
        Paging {
            cursors: self.next_cursor.iter().cloned().collect(),
            count: self.count,
        }
    }
}

impl<T: Serialize> Page<T> {
    /// Wraps `rows`, encoding the whole last row as the next cursor.
    ///
    /// # Errors
    ///
    /// Cursor encoding errors.
    pub fn from_rows(
        rows: Vec<T>,
        pagination: &Pagination,
        config: &PaginationConfig,
    ) -> PaginationResult<Self> {
        let next_cursor = match rows.last() {
            Some(last) if is_full(rows.len(), pagination, config) => Some(encode_cursor(last)?),
            _ => None,
        };

        Ok(Self {
            data: rows,
            next_cursor,
            count: None,
        })
    }
}

fn is_full(len: usize, pagination: &Pagination, config: &PaginationConfig) -> bool {
    let limit = usize::try_from(pagination.effective_limit(config)).unwrap_or(usize::MAX);
    len >= limit
}
