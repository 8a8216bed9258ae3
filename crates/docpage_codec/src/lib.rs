//! # DocPage Codec
//!
//! Document values and opaque cursor tokens for DocPage.
//!
//! This crate provides:
//! - [`Value`] and [`Document`], the ordered value model used by generated
//!   pipeline stages, with extended-JSON rendering
//! - [`CursorCodec`], which turns a row's sortable fields into an opaque
//!   token and back
//!
//! ## Cursor tokens
//!
//! A token is the standard-alphabet base64 encoding of the JSON
//! serialization of the sortable-field record. The two stages are separate
//! traits ([`StructuredFormat`], [`TextEncoding`]) so either can be swapped
//! without touching the pagination logic.
//!
//! ## Usage
//!
//! ```
//! use docpage_codec::CursorCodec;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct Position {
//!     #[serde(rename = "createdAt")]
//!     created_at: Option<i64>,
//! }
//!
//! let codec = CursorCodec::new();
//! let token = codec.encode(&Position { created_at: Some(42) }).unwrap();
//!
//! let mut decoded = Position::default();
//! codec.decode(&[token], &mut decoded).unwrap();
//! assert_eq!(decoded.created_at, Some(42));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cursor;
mod decoder;
mod encoder;
mod error;
pub mod format;
pub mod text;
mod value;

pub use cursor::{CursorCodec, MAX_CURSORS};
pub use decoder::from_json_str;
pub use encoder::{to_json_string, to_json_string_pretty, DATE_KEY, UUID_KEY};
pub use error::{BoxedSource, CodecError, CodecResult};
pub use format::{JsonFormat, StructuredFormat};
pub use text::{Base64Text, TextEncoding};
pub use value::{Document, Value};

/// Encodes `value` with the default codec.
///
/// # Errors
///
/// See [`CursorCodec::encode`].
pub fn encode_cursor<T: serde::Serialize + ?Sized>(value: &T) -> CodecResult<String> {
    CursorCodec::new().encode(value)
}

/// Decodes `cursors` into `dest` with the default codec.
///
/// # Errors
///
/// See [`CursorCodec::decode`].
pub fn decode_cursor<T, S>(cursors: &[S], dest: &mut T) -> CodecResult<()>
where
    T: serde::de::DeserializeOwned,
    S: AsRef<str>,
{
    CursorCodec::new().decode(cursors, dest)
}
