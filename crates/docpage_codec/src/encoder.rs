//! Extended-JSON rendering of document values.
//!
//! Scalars map onto their natural JSON counterparts. Types without a JSON
//! equivalent use a single-key wrapper document:
//! - timestamps render as `{"$date": "<rfc3339>"}`
//! - UUIDs render as `{"$uuid": "<hyphenated>"}`
//!
//! Documents render as JSON objects with keys in insertion order.

use chrono::SecondsFormat;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{CodecError, CodecResult};
use crate::value::{Document, Value};

/// Wrapper key for timestamps.
pub const DATE_KEY: &str = "$date";

/// Wrapper key for UUIDs.
pub const UUID_KEY: &str = "$uuid";

/// Render a value as a compact JSON string.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_json_string(value: &Value) -> CodecResult<String> {
    serde_json::to_string(value).map_err(CodecError::serialize)
}

/// Render a value as an indented JSON string.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_json_string_pretty(value: &Value) -> CodecResult<String> {
    serde_json::to_string_pretty(value).map_err(CodecError::serialize)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Double(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(DATE_KEY, &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
                map.end()
            }
            Value::Uuid(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(UUID_KEY, &id.hyphenated().to_string())?;
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Document(doc) => doc.serialize(serializer),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn scalars() {
        assert_eq!(to_json_string(&Value::Null).unwrap(), "null");
        assert_eq!(to_json_string(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(to_json_string(&Value::Int(-7)).unwrap(), "-7");
        assert_eq!(to_json_string(&Value::Double(10.5)).unwrap(), "10.5");
        assert_eq!(to_json_string(&Value::from("x")).unwrap(), "\"x\"");
    }

    #[test]
    fn datetime_uses_date_wrapper() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            to_json_string(&Value::DateTime(dt)).unwrap(),
            r#"{"$date":"2024-03-01T12:30:00Z"}"#
        );
    }

    #[test]
    fn uuid_uses_uuid_wrapper() {
        assert_eq!(
            to_json_string(&Value::Uuid(Uuid::nil())).unwrap(),
            r#"{"$uuid":"00000000-0000-0000-0000-000000000000"}"#
        );
    }

    #[test]
    fn document_preserves_key_order() {
        let doc = Document::new().with("totalDistance", -1).with("createdAt", -1);
        assert_eq!(
            to_json_string(&Value::Document(doc)).unwrap(),
            r#"{"totalDistance":-1,"createdAt":-1}"#
        );
    }

    #[test]
    fn nested_arrays_and_documents() {
        let value = Value::Document(Document::single(
            "$or",
            vec![
                Value::Document(Document::single("a", 1)),
                Value::Document(Document::single("b", Value::Null)),
            ],
        ));
        assert_eq!(
            to_json_string(&value).unwrap(),
            r#"{"$or":[{"a":1},{"b":null}]}"#
        );
    }
}
