//! CLI command implementations.

pub mod cursor;
pub mod pipeline;

use docpage_codec::{to_json_string, to_json_string_pretty, CodecResult, Value};
use thiserror::Error;

/// How JSON is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Indented, one field per line.
    Pretty,
    /// Single line.
    Compact,
}

impl Output {
    /// Renders `value` in this style.
    pub fn render(self, value: &Value) -> CodecResult<String> {
        match self {
            Self::Pretty => to_json_string_pretty(value),
            Self::Compact => to_json_string(value),
        }
    }
}

/// Input the CLI rejects before calling into the library.
#[derive(Debug, Error)]
pub enum CliError {
    /// The cursor body is not a JSON object.
    #[error("cursor body must be a JSON object, got {kind}")]
    NotAnObject {
        /// Kind of value that was given.
        kind: &'static str,
    },

    /// A sortable field name is empty.
    #[error("field names must not be empty")]
    EmptyField,
}
