//! Structured serialization stage of the cursor codec.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};

/// Turns a value into bytes and back.
///
/// Implementations must be deterministic for a given input so that the same
/// row always yields the same cursor.
pub trait StructuredFormat {
    /// Serialize `value` into bytes.
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Deserialize bytes into a `T`.
    ///
    /// Failures must be reported as [`CodecError::ShapeMismatch`].
    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T>;
}

/// Compact JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormat;

impl StructuredFormat for JsonFormat {
    fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(CodecError::serialize)
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(CodecError::shape_mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Position {
        #[serde(rename = "createdAt")]
        created_at: Option<i64>,
    }

    #[test]
    fn marshal_is_compact_json() {
        let bytes = JsonFormat
            .marshal(&Position {
                created_at: Some(5),
            })
            .unwrap();
        assert_eq!(bytes, br#"{"createdAt":5}"#);
    }

    #[test]
    fn unmarshal_reports_shape_mismatch() {
        let err = JsonFormat
            .unmarshal::<Position>(br#"{"createdAt":"five"}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::ShapeMismatch { .. }));
    }

    #[test]
    fn unmarshal_reports_invalid_json_as_shape_mismatch() {
        let err = JsonFormat.unmarshal::<Position>(b"{not json").unwrap_err();
        assert!(matches!(err, CodecError::ShapeMismatch { .. }));
    }
}
