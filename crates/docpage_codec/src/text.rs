//! Binary-to-text stage of the cursor codec.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CodecError, CodecResult};

/// Turns bytes into a token that survives text channels, and back.
pub trait TextEncoding {
    /// Encode raw bytes.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decode a token.
    ///
    /// Failures must be reported as [`CodecError::MalformedToken`].
    fn decode(&self, token: &str) -> CodecResult<Vec<u8>>;
}

/// Standard-alphabet, padded base64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Text;

impl TextEncoding for Base64Text {
    fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn decode(&self, token: &str) -> CodecResult<Vec<u8>> {
        STANDARD.decode(token).map_err(CodecError::malformed_token)
    }
}
