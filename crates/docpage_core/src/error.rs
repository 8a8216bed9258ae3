//! Error types for DocPage core.

use docpage_codec::CodecError;
use thiserror::Error;

/// Result type for pagination operations.
pub type PaginationResult<T> = Result<T, PaginationError>;

/// Errors that can occur while building a pagination pipeline.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// No model was supplied.
    #[error("required model")]
    InvalidModel,

    /// The model does not describe a record.
    #[error("model must be a record, got {type_name}")]
    ModelShape {
        /// Type name of the offending shape.
        type_name: String,
    },

    /// Nested records go deeper than the extractor allows.
    #[error("model nesting exceeds {max} levels")]
    NestingTooDeep {
        /// Maximum supported depth.
        max: usize,
    },

    /// Cursor encode/decode error.
    #[error("cursor error: {0}")]
    Codec(#[from] CodecError),
}

impl PaginationError {
    /// Creates a model shape error.
    pub fn model_shape(type_name: impl Into<String>) -> Self {
        Self::ModelShape {
            type_name: type_name.into(),
        }
    }

    /// Whether the request issuer caused this error.
    ///
    /// Only bad cursor tokens are the client's fault; model errors come from
    /// how the server wired the entity.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Codec(err) => err.is_client_error(),
            Self::InvalidModel | Self::ModelShape { .. } | Self::NestingTooDeep { .. } => false,
        }
    }
}
