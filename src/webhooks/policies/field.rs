//! Nested field access on schema-less resource data.
//!
//! Resources arrive as `DynamicObject`, so everything outside `metadata`
//! is an untyped `serde_json::Value`. This module walks a fixed key path
//! through that tree and hands back a string, without guessing at shapes
//! it does not recognize.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading a nested field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The path exists but does not hold the expected type.
    #[error("{path} accessor error: {found} is of the type {kind}, expected {expected}")]
    MalformedField {
        /// Dotted path of the offending value (e.g. `.spec.ingressClassName`)
        path: String,
        /// The value that was found, rendered as JSON
        found: String,
        /// JSON type of the value that was found
        kind: &'static str,
        /// JSON type that was expected at this position
        expected: &'static str,
    },
}

/// Render a key path the way kubectl does (`.spec.ingressClassName`).
pub fn dotted(path: &[&str]) -> String {
    path.iter().map(|segment| format!(".{}", segment)).collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn malformed(path: &[&str], value: &Value, expected: &'static str) -> FieldError {
    FieldError::MalformedField {
        path: dotted(path),
        found: value.to_string(),
        kind: kind_of(value),
        expected,
    }
}

/// Read the string stored at `path` inside `data`.
///
/// Returns `Ok(None)` when any key along the path is missing. A value that
/// exists but is not a string is a [`FieldError::MalformedField`], as is an
/// intermediate value that is not an object (the walk cannot continue).
pub fn nested_string(data: &Value, path: &[&str]) -> Result<Option<String>, FieldError> {
    let mut current = data;
    for (depth, key) in path.iter().enumerate() {
        let Value::Object(map) = current else {
            return Err(malformed(path.get(..depth).unwrap_or(path), current, "object"));
        };
        match map.get(*key) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    match current {
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(malformed(path, other, "string")),
    }
}
