//! Cursor encode/decode commands.

use docpage_codec::{encode_cursor, from_json_str, CursorCodec, Value};
use tracing::debug;

use super::{CliError, Output};

/// Encodes a JSON object into a cursor token.
///
/// Key order is preserved, so the token decodes back into the same
/// priority order.
pub fn encode(json: &str) -> Result<String, Box<dyn std::error::Error>> {
    let value = from_json_str(json)?;
    if !matches!(value, Value::Document(_)) {
        return Err(CliError::NotAnObject {
            kind: kind_of(&value),
        }
        .into());
    }

    let token = encode_cursor(&value)?;
    debug!(bytes = token.len(), "encoded cursor");
    Ok(token)
}

/// Decodes a cursor token and renders its JSON body.
pub fn decode(token: &str, output: Output) -> Result<String, Box<dyn std::error::Error>> {
    let value: Value = CursorCodec::new().decode_token(token)?;
    Ok(output.render(&value)?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Int(_) | Value::Double(_) => "a number",
        Value::Text(_) => "a string",
        Value::DateTime(_) => "a date",
        Value::Uuid(_) => "a uuid",
        Value::Array(_) => "an array",
        Value::Document(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_reference_token() {
        let token = encode(r#"{"totalDistance":null,"createdAt":1}"#).unwrap();
        assert_eq!(token, "eyJ0b3RhbERpc3RhbmNlIjpudWxsLCJjcmVhdGVkQXQiOjF9");
    }

    #[test]
    fn encode_rejects_non_objects() {
        let err = encode("[1,2]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cursor body must be a JSON object, got an array"
        );
        assert!(encode("not json").is_err());
    }

    #[test]
    fn decode_keeps_key_order() {
        let token = encode(r#"{"totalDistance":10,"createdAt":7}"#).unwrap();
        assert_eq!(
            decode(&token, Output::Compact).unwrap(),
            r#"{"totalDistance":10,"createdAt":7}"#
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("%%%", Output::Pretty).is_err());
    }
}
