//! In-memory pipeline evaluation.
//!
//! [`MemoryStore`] runs a [`Pipeline`] over a fixed set of rows with the
//! semantics a document store gives `$match`, `$sort`, `$skip` and `$limit`.
//! The walkers page through a store the way a client would, feeding each
//! page's next cursor back into the following request.

use std::cmp::Ordering;

use docpage_codec::{Document, Value};
use docpage_core::{
    cursor_pipeline_with_config, page_pipeline_with_config, CompareOp, Page, Pagination,
    PaginationConfig, PaginationResult, Pipeline, Predicate, SortOrder, Sortable, Stage,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::fixtures::Run;

/// A row the store can filter and sort.
pub trait StoredRow: Clone {
    /// Field view used for matching and sorting.
    fn to_document(&self) -> Document;
}

impl StoredRow for Run {
    fn to_document(&self) -> Document {
        Run::to_document(self)
    }
}

impl StoredRow for Document {
    fn to_document(&self) -> Document {
        self.clone()
    }
}

/// Rows held in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore<R> {
    rows: Vec<R>,
}

impl<R: StoredRow> MemoryStore<R> {
    /// Creates a store over `rows`.
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Runs `pipeline` and returns the surviving rows.
    pub fn aggregate(&self, pipeline: &Pipeline) -> Vec<R> {
        let mut rows: Vec<(Document, &R)> = self
            .rows
            .iter()
            .map(|row| (row.to_document(), row))
            .collect();

        for stage in pipeline.stages() {
            match stage {
                Stage::Match(predicate) => rows.retain(|(doc, _)| matches(doc, predicate)),
                Stage::Sort(clauses) => rows.sort_by(|a, b| order_rows(&a.0, &b.0, clauses)),
                Stage::Skip(n) => {
                    let n = usize::try_from(*n).unwrap_or(0).min(rows.len());
                    rows.drain(..n);
                }
                Stage::Limit(n) => rows.truncate(usize::try_from(*n).unwrap_or(0)),
            }
        }

        rows.into_iter().map(|(_, row)| row.clone()).collect()
    }
}

/// Whether `row` satisfies `predicate`.
///
/// Comparisons against a missing field or a value of another type are false.
pub fn matches(row: &Document, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Compare { field, op, value } => {
            let ord = row.get(field).and_then(|actual| compare_values(actual, value));
            match op {
                CompareOp::Lt => ord == Some(Ordering::Less),
                CompareOp::Gt => ord == Some(Ordering::Greater),
            }
        }
        Predicate::Equals { field, value } => row
            .get(field)
            .and_then(|actual| compare_values(actual, value))
            == Some(Ordering::Equal),
        Predicate::And(items) => items.iter().all(|p| matches(row, p)),
        Predicate::Or(items) => items.iter().any(|p| matches(row, p)),
    }
}

/// Orders two values of compatible types; numbers compare across widths.
#[allow(clippy::cast_precision_loss)]
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Double(y)) => (*x as f64).partial_cmp(y),
        (Value::Double(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Value::Double(x), Value::Double(y)) => x.partial_cmp(y),
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
        (Value::Uuid(x), Value::Uuid(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn order_rows(a: &Document, b: &Document, clauses: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in clauses {
        // missing sorts first, like null
        let ord = match (a.get(field), b.get(field)) {
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Walks every cursor page of `store`, starting from `request`.
///
/// Each page is built into a [`Page`] whose next cursor is `to_cursor` of
/// its last row; the walk stops at the first page without one. Returns the
/// rows in the order they were served.
///
/// # Errors
///
/// Errors building a pipeline or encoding a cursor.
///
/// # Panics
///
/// If the walk serves more pages than the store has rows plus one, which
/// means the continuation never moved forward.
pub fn walk_cursor_pages<R, C, F>(
    store: &MemoryStore<R>,
    request: &Pagination,
    config: &PaginationConfig,
    to_cursor: F,
) -> PaginationResult<Vec<R>>
where
    R: StoredRow,
    C: Sortable + Serialize + DeserializeOwned + Default,
    F: Fn(&R) -> C,
{
    let mut request = request.clone();
    let mut served = Vec::new();

    for _ in 0..=store.len() + 1 {
        let mut model = C::default();
        let pipeline = cursor_pipeline_with_config(Some(&mut model), &request, config)?;
        let rows = store.aggregate(&pipeline);

        let page = Page::from_rows_with(rows, &request, config, &to_cursor)?;
        let next = page.next_cursor.clone();
        served.extend(page.data);

        match next {
            Some(token) => request.cursors = vec![token],
            None => return Ok(served),
        }
    }

    panic!("cursor walk did not terminate after {} pages", store.len() + 2);
}

/// Walks page mode from page 1 until a short page.
pub fn walk_pages<R: StoredRow>(
    store: &MemoryStore<R>,
    request: &Pagination,
    config: &PaginationConfig,
) -> Vec<R> {
    let mut request = request.normalized(config);
    request.page = 1;
    let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
    let mut served = Vec::new();

    loop {
        let rows = store.aggregate(&page_pipeline_with_config(&request, config));
        let short = rows.len() < limit;
        served.extend(rows);

        if short {
            return served;
        }
        request.page += 1;
    }
}
