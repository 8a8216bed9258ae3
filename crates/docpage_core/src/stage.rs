//! Aggregation pipeline stages.
//!
//! Stages are typed here and rendered to the store's wire documents by
//! [`Stage::to_document`]. The operator keys are the store's query API and
//! must not change.

use docpage_codec::{Document, Value};
use serde::{Serialize, Serializer};

use crate::request::OrderDirection;

/// `$match` stage key.
pub const MATCH: &str = "$match";
/// `$sort` stage key.
pub const SORT: &str = "$sort";
/// `$skip` stage key.
pub const SKIP: &str = "$skip";
/// `$limit` stage key.
pub const LIMIT: &str = "$limit";
/// Conjunction operator.
pub const AND: &str = "$and";
/// Disjunction operator.
pub const OR: &str = "$or";

/// Strict comparison used to continue after a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `$lt`
    Lt,
    /// `$gt`
    Gt,
}

impl CompareOp {
    /// Operator key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "$lt",
            Self::Gt => "$gt",
        }
    }
}

impl From<OrderDirection> for CompareOp {
    fn from(direction: OrderDirection) -> Self {
        match direction {
            OrderDirection::Asc => Self::Gt,
            OrderDirection::Desc => Self::Lt,
        }
    }
}

/// Sort ordinal of a `$sort` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// `1`
    Ascending,
    /// `-1`
    Descending,
}

impl SortOrder {
    /// Ordinal written to the wire.
    pub const fn ordinal(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl From<OrderDirection> for SortOrder {
    fn from(direction: OrderDirection) -> Self {
        match direction {
            OrderDirection::Asc => Self::Ascending,
            OrderDirection::Desc => Self::Descending,
        }
    }
}

/// A `$match` predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `{field: {op: value}}`
    Compare {
        /// Field name.
        field: String,
        /// Operator.
        op: CompareOp,
        /// Operand.
        value: Value,
    },
    /// `{field: value}`
    Equals {
        /// Field name.
        field: String,
        /// Operand.
        value: Value,
    },
    /// `{"$and": [..]}`
    And(Vec<Predicate>),
    /// `{"$or": [..]}`
    Or(Vec<Predicate>),
}

impl Predicate {
    /// `{field: {op: value}}`
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// `{field: value}`
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Renders the predicate as a filter document.
    pub fn to_document(&self) -> Document {
        match self {
            Self::Compare { field, op, value } => {
                Document::single(field.clone(), Document::single(op.as_str(), value.clone()))
            }
            Self::Equals { field, value } => Document::single(field.clone(), value.clone()),
            Self::And(items) => Document::single(AND, render_all(items)),
            Self::Or(items) => Document::single(OR, render_all(items)),
        }
    }
}

fn render_all(items: &[Predicate]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|p| Value::Document(p.to_document()))
            .collect(),
    )
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Filter rows.
    Match(Predicate),
    /// Order rows; clauses apply in order.
    Sort(Vec<(String, SortOrder)>),
    /// Drop the first `n` rows.
    Skip(i64),
    /// Keep at most `n` rows.
    Limit(i64),
}

impl Stage {
    /// Stage key (`$match`, `$sort`, ...).
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Match(_) => MATCH,
            Self::Sort(_) => SORT,
            Self::Skip(_) => SKIP,
            Self::Limit(_) => LIMIT,
        }
    }

    /// Renders the stage as `{key: body}`.
    pub fn to_document(&self) -> Document {
        let body = match self {
            Self::Match(predicate) => Value::Document(predicate.to_document()),
            Self::Sort(clauses) => Value::Document(
                clauses
                    .iter()
                    .map(|(field, order)| (field.clone(), order.ordinal()))
                    .collect(),
            ),
            Self::Skip(n) | Self::Limit(n) => Value::Int(*n),
        };
        Document::single(self.key(), body)
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

/// An ordered list of stages, ready to hand to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// The stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage keys in order, handy for assertions and logs.
    pub fn keys(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::key).collect()
    }

    /// Renders every stage.
    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }

    /// Consumes the pipeline, returning its stages.
    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }
}

impl From<Vec<Stage>> for Pipeline {
    fn from(stages: Vec<Stage>) -> Self {
        Self { stages }
    }
}

impl IntoIterator for Pipeline {
    type Item = Stage;
    type IntoIter = std::vec::IntoIter<Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.into_iter()
    }
}

impl Serialize for Pipeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.stages)
    }
}
