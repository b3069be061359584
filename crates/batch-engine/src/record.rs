//! Field access helpers for JSON records
//!
//! Records arrive as untyped property bags. These helpers validate fields
//! at the transform boundary, producing `TransformError::validation`
//! instead of silently reading nulls.

use serde_json::{Map, Value};

use crate::error::TransformError;

/// Require a string field.
pub fn require_str<'a>(record: &'a Value, field: &str) -> Result<&'a str, TransformError> {
    record
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| TransformError::validation(format!("missing required field '{}'", field)))
}

/// Require a string field that is non-empty after trimming.
pub fn require_non_empty_str<'a>(
    record: &'a Value,
    field: &str,
) -> Result<&'a str, TransformError> {
    let value = require_str(record, field)?;
    if value.trim().is_empty() {
        return Err(TransformError::validation(format!(
            "required field '{}' is empty",
            field
        )));
    }
    Ok(value)
}

/// Require the record itself to be a JSON object.
pub fn require_object(record: &Value) -> Result<&Map<String, Value>, TransformError> {
    record
        .as_object()
        .ok_or_else(|| TransformError::validation("record is not an object"))
}

/// Optional string field; `None` when absent or not a string.
pub fn optional_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}

/// Optional unsigned integer field.
pub fn optional_u64(record: &Value, field: &str) -> Option<u64> {
    record.get(field).and_then(|v| v.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_require_str() {
        let record = json!({"title": "Hello"});
        assert_eq!(require_str(&record, "title").unwrap(), "Hello");

        let err = require_str(&record, "link").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_require_str_rejects_non_string() {
        let record = json!({"title": 42});
        assert!(require_str(&record, "title").is_err());
    }

    #[test]
    fn test_require_non_empty_str() {
        let record = json!({"title": "  "});
        let err = require_non_empty_str(&record, "title").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_optional_fields() {
        let record = json!({"title": "A", "duration": 120});
        assert_eq!(optional_str(&record, "title"), Some("A"));
        assert_eq!(optional_str(&record, "missing"), None);
        assert_eq!(optional_u64(&record, "duration"), Some(120));
    }

    #[test]
    fn test_require_object() {
        assert!(require_object(&json!({"a": 1})).is_ok());
        assert!(require_object(&json!("not an object")).is_err());
    }
}
