//! Extended-JSON parsing of document values.
//!
//! The inverse of the encoder: `{"$date": ..}` and `{"$uuid": ..}` wrapper
//! documents are turned back into typed values, everything else maps onto
//! the natural variant. Object key order is preserved.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use uuid::Uuid;

use crate::encoder::{DATE_KEY, UUID_KEY};
use crate::error::{CodecError, CodecResult};
use crate::value::{Document, Value};

/// Parse a JSON string into a value.
///
/// # Errors
///
/// Returns [`CodecError::ShapeMismatch`] if the input is not valid JSON or
/// contains a malformed wrapper document.
pub fn from_json_str(input: &str) -> CodecResult<Value> {
    serde_json::from_str(input).map_err(CodecError::shape_mismatch)
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a document value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {v} does not fit in i64")))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Double(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        let doc = DocumentVisitor.visit_map(map)?;
        unwrap_extended::<A::Error>(doc)
    }
}

/// Turns single-key wrapper documents back into typed values.
fn unwrap_extended<E: de::Error>(doc: Document) -> Result<Value, E> {
    if doc.len() != 1 {
        return Ok(Value::Document(doc));
    }

    let folded = match doc.iter().next() {
        Some((DATE_KEY, Value::Text(raw))) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|err| E::custom(format!("invalid {DATE_KEY} value {raw:?}: {err}"))),
        ),
        Some((UUID_KEY, Value::Text(raw))) => Some(
            Uuid::parse_str(raw)
                .map(Value::Uuid)
                .map_err(|err| E::custom(format!("invalid {UUID_KEY} value {raw:?}: {err}"))),
        ),
        _ => None,
    };

    folded.unwrap_or(Ok(Value::Document(doc)))
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut doc = Document::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            doc.push(key, value);
        }
        Ok(doc)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}
