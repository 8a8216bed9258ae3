//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Boxed source error carried by the serialization variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while encoding or decoding cursor tokens.
#[derive(Error, Debug)]
pub enum CodecError {
    /// More than one cursor token was supplied.
    #[error("invalid length of cursor: expected at most 1 token, got {count}")]
    InvalidCursorLength {
        /// Number of tokens supplied.
        count: usize,
    },

    /// Encoding produced an empty token.
    #[error("encode cursor error: token is empty")]
    Encode,

    /// The value could not be serialized.
    #[error("serializing cursor failed: {source}")]
    Serialize {
        /// Underlying serializer error.
        #[source]
        source: BoxedSource,
    },

    /// The token is not valid text-encoded data.
    #[error("malformed cursor token: {source}")]
    MalformedToken {
        /// Underlying text decoding error.
        #[source]
        source: BoxedSource,
    },

    /// The decoded payload does not fit the destination type.
    #[error("cursor does not match destination shape: {source}")]
    ShapeMismatch {
        /// Underlying deserializer error.
        #[source]
        source: BoxedSource,
    },
}

impl CodecError {
    /// Create an invalid cursor length error.
    pub fn invalid_cursor_length(count: usize) -> Self {
        Self::InvalidCursorLength { count }
    }

    /// Create a serialize error.
    pub fn serialize(source: impl Into<BoxedSource>) -> Self {
        Self::Serialize {
            source: source.into(),
        }
    }

    /// Create a malformed token error.
    pub fn malformed_token(source: impl Into<BoxedSource>) -> Self {
        Self::MalformedToken {
            source: source.into(),
        }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(source: impl Into<BoxedSource>) -> Self {
        Self::ShapeMismatch {
            source: source.into(),
        }
    }

    /// Whether the error was caused by the token a client supplied.
    ///
    /// `Encode` and `Serialize` happen on the server side while building a
    /// token and are not the client's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCursorLength { .. }
                | Self::MalformedToken { .. }
                | Self::ShapeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_classification() {
        assert!(CodecError::invalid_cursor_length(2).is_client_error());
        assert!(CodecError::malformed_token("bad byte").is_client_error());
        assert!(CodecError::shape_mismatch("wrong type").is_client_error());
        assert!(!CodecError::Encode.is_client_error());
        assert!(!CodecError::serialize("nan").is_client_error());
    }

    #[test]
    fn display_includes_count() {
        let err = CodecError::invalid_cursor_length(3);
        assert_eq!(
            err.to_string(),
            "invalid length of cursor: expected at most 1 token, got 3"
        );
    }
}
