//! Opaque cursor tokens.
//!
//! A cursor is the sort position of the last row a client has seen. It is
//! built in two stages: a [`StructuredFormat`] serializes the row's
//! sortable fields and a [`TextEncoding`] makes the bytes safe to carry in
//! a query string. Clients only ever echo the token back.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{CodecError, CodecResult};
use crate::format::{JsonFormat, StructuredFormat};
use crate::text::{Base64Text, TextEncoding};

/// Maximum number of cursor tokens a request may carry.
pub const MAX_CURSORS: usize = 1;

/// Encodes and decodes cursor tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorCodec<F = JsonFormat, E = Base64Text> {
    format: F,
    encoding: E,
}

impl CursorCodec {
    /// JSON bodies in standard base64.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            format: JsonFormat,
            encoding: Base64Text,
        }
    }
}

impl<F: StructuredFormat, E: TextEncoding> CursorCodec<F, E> {
    /// Creates a codec from explicit stages.
    pub const fn with_stages(format: F, encoding: E) -> Self {
        Self { format, encoding }
    }

    /// Encodes `value` into a token.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialize`] if the value cannot be serialized and
    /// [`CodecError::Encode`] if the resulting token is empty.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<String> {
        let bytes = self.format.marshal(value).inspect_err(|err| {
            warn!(entity = type_name::<T>(), error = %err, "encode cursor failed");
        })?;

        let token = self.encoding.encode(&bytes);
        if token.is_empty() {
            return Err(CodecError::Encode);
        }

        Ok(token)
    }

    /// Decodes a single token into a new `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedToken`] if the token is not valid
    /// text-encoded data and [`CodecError::ShapeMismatch`] if the payload does
    /// not deserialize into `T`.
    pub fn decode_token<T: DeserializeOwned>(&self, token: &str) -> CodecResult<T> {
        let bytes = self.encoding.decode(token).inspect_err(|err| {
            warn!(cursor = token, error = %err, "decode cursor token failed");
        })?;

        self.format.unmarshal(&bytes).inspect_err(|err| {
            warn!(
                cursor = token,
                entity = type_name::<T>(),
                error = %err,
                "cursor does not match entity"
            );
        })
    }

    /// Decodes the request's cursors into `dest`.
    ///
    /// With no cursors this is a no-op and `dest` is left untouched. With one
    /// cursor `dest` is replaced by the decoded value; on failure `dest` is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorLength`] when more than [`MAX_CURSORS`]
    /// tokens are supplied, otherwise the errors of [`CursorCodec::decode_token`].
    pub fn decode<T, S>(&self, cursors: &[S], dest: &mut T) -> CodecResult<()>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        if cursors.len() > MAX_CURSORS {
            warn!(
                count = cursors.len(),
                max = MAX_CURSORS,
                "invalid cursors, cursors must have one item"
            );
            return Err(CodecError::invalid_cursor_length(cursors.len()));
        }

        if let Some(token) = cursors.first() {
            *dest = self.decode_token(token.as_ref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Position {
        #[serde(default)]
        total_distance: Option<f64>,
        #[serde(default)]
        created_at: Option<i64>,
    }

    /// Text stage that always produces an empty token.
    struct Blank;

    impl TextEncoding for Blank {
        fn encode(&self, _bytes: &[u8]) -> String {
            String::new()
        }

        fn decode(&self, _token: &str) -> CodecResult<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn encode_produces_base64_json() {
        let token = CursorCodec::new()
            .encode(&Position {
                total_distance: None,
                created_at: Some(1),
            })
            .unwrap();

        // base64 of {"totalDistance":null,"createdAt":1}
        assert_eq!(token, "eyJ0b3RhbERpc3RhbmNlIjpudWxsLCJjcmVhdGVkQXQiOjF9");
    }

    #[test]
    fn roundtrip_restores_value() {
        let codec = CursorCodec::new();
        let original = Position {
            total_distance: Some(10.0),
            created_at: Some(1_700_000_000),
        };

        let token = codec.encode(&original).unwrap();
        let mut decoded = Position::default();
        codec.decode(&[token], &mut decoded).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_without_cursors_leaves_destination_untouched() {
        let mut dest = Position {
            total_distance: Some(3.0),
            created_at: None,
        };
        let before = dest.clone();

        CursorCodec::new()
            .decode::<_, String>(&[], &mut dest)
            .unwrap();

        assert_eq!(dest, before);
    }

    #[test]
    fn decode_rejects_two_cursors() {
        let codec = CursorCodec::new();
        let token = codec.encode(&Position::default()).unwrap();
        let mut dest = Position::default();

        let err = codec
            .decode(&[token.clone(), token], &mut dest)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidCursorLength { count: 2 }));
    }

    #[test]
    fn decode_accepts_up_to_max_cursors() {
        let codec = CursorCodec::new();
        let position = Position {
            total_distance: Some(3.5),
            created_at: Some(9),
        };
        let tokens = vec![codec.encode(&position).unwrap(); MAX_CURSORS];
        let mut dest = Position::default();

        codec.decode(tokens.as_slice(), &mut dest).unwrap();
        assert_eq!(dest, position);

        let too_many = vec![tokens[0].clone(); MAX_CURSORS + 1];
        let err = codec.decode(too_many.as_slice(), &mut dest).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidCursorLength { count } if count == MAX_CURSORS + 1
        ));
    }

    #[test]
    fn decode_distinguishes_malformed_from_mismatch() {
        let codec = CursorCodec::new();
        let mut dest = Position::default();

        let err = codec.decode(&["%%%"], &mut dest).unwrap_err();
        assert!(matches!(err, CodecError::MalformedToken { .. }));

        // base64 of {"createdAt":"soon"}
        let err = codec
            .decode(&["eyJjcmVhdGVkQXQiOiJzb29uIn0="], &mut dest)
            .unwrap_err();
        assert!(matches!(err, CodecError::ShapeMismatch { .. }));
    }

    #[test]
    fn failed_decode_keeps_destination() {
        let codec = CursorCodec::new();
        let mut dest = Position {
            total_distance: Some(1.0),
            created_at: Some(2),
        };
        let before = dest.clone();

        assert!(codec.decode(&["%%%"], &mut dest).is_err());
        assert_eq!(dest, before);
    }

    #[test]
    fn empty_token_is_an_encode_error() {
        let codec = CursorCodec::with_stages(JsonFormat, Blank);
        let err = codec.encode(&Position::default()).unwrap_err();
        assert!(matches!(err, CodecError::Encode));
    }
}
