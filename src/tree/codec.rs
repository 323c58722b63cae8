//! (De)serialization between the persisted JSON value and the typed tree.
//!
//! `decode` performs structural recognition only — it never repairs. A value
//! that is absent or does not have the shape of a root folder is reported as
//! such, and the caller (repair) decides what to do about it. `encode` is the
//! identity transform: the in-memory shape IS the persisted shape.

use serde_json::Value;

use crate::types::errors::DecodeError;
use crate::types::node::Root;

/// Recognizes a raw persisted value as a [`Root`].
///
/// `None` (nothing stored) maps to [`DecodeError::Absent`]; any value that is
/// not a well-formed root folder object maps to [`DecodeError::Malformed`].
pub fn decode(raw: Option<&Value>) -> Result<Root, DecodeError> {
    let value = raw.ok_or(DecodeError::Absent)?;
    if !value.is_object() {
        return Err(DecodeError::Malformed(format!(
            "expected an object, got {}",
            json_kind(value)
        )));
    }
    serde_json::from_value(value.clone()).map_err(|e| DecodeError::Malformed(e.to_string()))
}

/// Serializes a [`Root`] to the persistable JSON value.
pub fn encode(root: &Root) -> Result<Value, serde_json::Error> {
    serde_json::to_value(root)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
