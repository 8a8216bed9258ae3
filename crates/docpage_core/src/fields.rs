//! Sortable-field extraction.
//!
//! Entities describe their sortable fields through [`Sortable`]. The
//! extractor walks that description in declaration order, splices nested
//! records in place and returns the flat `(name, value)` list that both the
//! sort stage and the continuation predicate are built from. The position of
//! a field in the list is its sort priority.
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use docpage_core::{extract_fields, Field, Shape, Sortable};
//!
//! struct Run {
//!     total_distance: Option<f64>,
//!     created_at: Option<DateTime<Utc>>,
//! }
//!
//! impl Sortable for Run {
//!     fn shape(&self) -> Shape<'_> {
//!         Shape::Record(vec![
//!             Field::scalar("totalDistance", self.total_distance),
//!             Field::scalar("createdAt", self.created_at),
//!         ])
//!     }
//! }
//!
//! let run = Run { total_distance: Some(5.0), created_at: None };
//! let present = extract_fields(Some(&run), false).unwrap();
//! assert_eq!(present.len(), 1);
//! assert_eq!(present[0].name, "totalDistance");
//! ```

use docpage_codec::{Document, Value};
use tracing::warn;

use crate::error::{PaginationError, PaginationResult};

/// Deepest chain of nested records the extractor follows.
pub const MAX_NESTING_DEPTH: usize = 8;

/// A type whose sortable fields can be enumerated in priority order.
pub trait Sortable {
    /// Describes the value's sortable fields.
    fn shape(&self) -> Shape<'_>;
}

/// What a [`Sortable`] value looks like to the extractor.
pub enum Shape<'a> {
    /// A record with fields in declaration order.
    Record(Vec<Field<'a>>),
    /// Anything that is not a record. Extraction fails on it.
    Opaque {
        /// Name reported in the error.
        type_name: &'static str,
    },
}

impl Shape<'_> {
    /// An opaque shape named after `T`.
    pub fn opaque<T: ?Sized>() -> Self {
        Shape::Opaque {
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// One entry of a record shape.
pub enum Field<'a> {
    /// A leaf field. An empty `name` means the field is not serialized and
    /// never takes part in sorting.
    Scalar {
        /// External (serialized) field name.
        name: &'a str,
        /// Current value, `None` when absent.
        value: Option<Value>,
    },
    /// A nested record whose fields are spliced in place.
    Nested(&'a dyn Sortable),
}

impl<'a> Field<'a> {
    /// A leaf field from an optional value.
    pub fn scalar<V: Into<Value>>(name: &'a str, value: Option<V>) -> Self {
        Field::Scalar {
            name,
            value: value.map(Into::into),
        }
    }

    /// A leaf field that is always present.
    pub fn required(name: &'a str, value: impl Into<Value>) -> Self {
        Field::Scalar {
            name,
            value: Some(value.into()),
        }
    }

    /// A nested record.
    pub fn nested(inner: &'a dyn Sortable) -> Self {
        Field::Nested(inner)
    }
}

/// A field name with its value, as produced by [`extract_fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// External field name.
    pub name: String,
    /// Value, `None` only when extracted with `include_absent`.
    pub value: Option<Value>,
}

impl FieldValue {
    /// Creates a field value.
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Extracts the ordered sortable-field list of `model`.
///
/// Scalars with an empty name are skipped. Absent scalars are skipped unless
/// `include_absent` is set.
///
/// # Errors
///
/// - [`PaginationError::InvalidModel`] if `model` is `None`
/// - [`PaginationError::ModelShape`] if the model or a nested field is not a
///   record
/// - [`PaginationError::NestingTooDeep`] past [`MAX_NESTING_DEPTH`]
pub fn extract_fields(
    model: Option<&dyn Sortable>,
    include_absent: bool,
) -> PaginationResult<Vec<FieldValue>> {
    let Some(model) = model else {
        warn!("required model to extract sortable fields");
        return Err(PaginationError::InvalidModel);
    };

    let mut out = Vec::new();
    visit(model.shape(), include_absent, 0, &mut out)?;
    Ok(out)
}

fn visit(
    shape: Shape<'_>,
    include_absent: bool,
    depth: usize,
    out: &mut Vec<FieldValue>,
) -> PaginationResult<()> {
    let fields = match shape {
        Shape::Record(fields) => fields,
        Shape::Opaque { type_name } => {
            warn!(model = type_name, "model is not a record");
            return Err(PaginationError::model_shape(type_name));
        }
    };

    for field in fields {
        match field {
            Field::Nested(inner) => {
                if depth + 1 > MAX_NESTING_DEPTH {
                    return Err(PaginationError::NestingTooDeep {
                        max: MAX_NESTING_DEPTH,
                    });
                }
                visit(inner.shape(), include_absent, depth + 1, out)?;
            }
            Field::Scalar { name, value } => {
                if !name.is_empty() && (value.is_some() || include_absent) {
                    out.push(FieldValue::new(name, value));
                }
            }
        }
    }

    Ok(())
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: Sortable + ?Sized> Sortable for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

/// Documents are records in key order. Nested documents are spliced, nulls
/// count as absent.
impl Sortable for Document {
    fn shape(&self) -> Shape<'_> {
        Shape::Record(
            self.iter()
                .map(|(name, value)| match value {
                    Value::Document(inner) => Field::Nested(inner),
                    Value::Null => Field::Scalar { name, value: None },
                    other => Field::Scalar {
                        name,
                        value: Some(other.clone()),
                    },
                })
                .collect(),
        )
    }
}

impl Sortable for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Document(doc) => doc.shape(),
            Value::Null => Shape::Opaque { type_name: "null" },
            Value::Bool(_) => Shape::Opaque { type_name: "bool" },
            Value::Int(_) => Shape::Opaque { type_name: "int" },
            Value::Double(_) => Shape::Opaque { type_name: "double" },
            Value::Text(_) => Shape::Opaque { type_name: "text" },
            Value::DateTime(_) => Shape::Opaque {
                type_name: "datetime",
            },
            Value::Uuid(_) => Shape::Opaque { type_name: "uuid" },
            Value::Array(_) => Shape::Opaque { type_name: "array" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Audit {
        created_at: Option<i64>,
        updated_at: Option<i64>,
    }

    impl Sortable for Audit {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![
                Field::scalar("createdAt", self.created_at),
                Field::scalar("updatedAt", self.updated_at),
            ])
        }
    }

    struct Run {
        total_distance: Option<f64>,
        audit: Audit,
        internal: Option<i64>,
    }

    impl Sortable for Run {
        fn shape(&self) -> Shape<'_> {
            Shape::Record(vec![
                Field::scalar("totalDistance", self.total_distance),
                Field::nested(&self.audit),
                Field::scalar("", self.internal),
            ])
        }
    }

    struct Scalar;

    impl Sortable for Scalar {
        fn shape(&self) -> Shape<'_> {
            Shape::opaque::<u64>()
        }
    }

    struct Deep(Option<Box<Deep>>);

    impl Sortable for Deep {
        fn shape(&self) -> Shape<'_> {
            match &self.0 {
                Some(inner) => Shape::Record(vec![Field::nested(inner.as_ref())]),
                None => Shape::Record(vec![Field::required("leaf", 1)]),
            }
        }
    }

    fn deep(levels: usize) -> Deep {
        (0..levels).fold(Deep(None), |acc, _| Deep(Some(Box::new(acc))))
    }

    fn names(fields: &[FieldValue]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn flattens_nested_records_in_order() {
        let run = Run {
            total_distance: Some(10.0),
            audit: Audit {
                created_at: Some(1),
                updated_at: Some(2),
            },
            internal: Some(3),
        };

        let fields = extract_fields(Some(&run), false).unwrap();
        assert_eq!(names(&fields), vec!["totalDistance", "createdAt", "updatedAt"]);
        assert_eq!(fields[0].value, Some(Value::Double(10.0)));
        assert_eq!(fields[1].value, Some(Value::Int(1)));
    }

    #[test]
    fn skips_absent_values_unless_asked() {
        let run = Run {
            total_distance: None,
            audit: Audit {
                created_at: Some(1),
                updated_at: None,
            },
            internal: None,
        };

        let present = extract_fields(Some(&run), false).unwrap();
        assert_eq!(names(&present), vec!["createdAt"]);

        let all = extract_fields(Some(&run), true).unwrap();
        assert_eq!(names(&all), vec!["totalDistance", "createdAt", "updatedAt"]);
        assert_eq!(all[0].value, None);
    }

    #[test]
    fn unnamed_fields_never_appear() {
        let run = Run {
            total_distance: None,
            audit: Audit {
                created_at: None,
                updated_at: None,
            },
            internal: Some(9),
        };

        assert!(extract_fields(Some(&run), true)
            .unwrap()
            .iter()
            .all(|f| !f.name.is_empty()));
    }

    #[test]
    fn missing_model_is_invalid() {
        let err = extract_fields(None, false).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidModel));
    }

    #[test]
    fn opaque_model_is_rejected() {
        let err = extract_fields(Some(&Scalar), false).unwrap_err();
        assert!(matches!(err, PaginationError::ModelShape { ref type_name } if type_name == "u64"));

        let err = extract_fields(Some(&Value::Int(3)), true).unwrap_err();
        assert!(matches!(err, PaginationError::ModelShape { .. }));
    }

    #[test]
    fn nesting_depth_is_capped() {
        assert_eq!(
            names(&extract_fields(Some(&deep(MAX_NESTING_DEPTH)), false).unwrap()),
            vec!["leaf"]
        );

        let err = extract_fields(Some(&deep(MAX_NESTING_DEPTH + 1)), false).unwrap_err();
        assert!(matches!(err, PaginationError::NestingTooDeep { max: MAX_NESTING_DEPTH }));
    }

    #[test]
    fn documents_are_records() {
        let doc = Document::new()
            .with("totalDistance", 10)
            .with("meta", Document::new().with("createdAt", 5).with("deletedAt", ()))
            .with("avgPace", ());

        let present = extract_fields(Some(&doc), false).unwrap();
        assert_eq!(names(&present), vec!["totalDistance", "createdAt"]);

        let all = extract_fields(Some(&doc), true).unwrap();
        assert_eq!(
            names(&all),
            vec!["totalDistance", "createdAt", "deletedAt", "avgPace"]
        );
    }

    #[test]
    fn references_and_boxes_delegate() {
        let doc = Document::single("createdAt", 1);
        let boxed: Box<dyn Sortable> = Box::new(doc.clone());

        assert_eq!(extract_fields(Some(&&doc), false).unwrap().len(), 1);
        assert_eq!(extract_fields(Some(&boxed), false).unwrap().len(), 1);
    }
}
