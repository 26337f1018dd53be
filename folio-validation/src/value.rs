// Runtime kinds of raw field values

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Expected-type names understood by the type-checking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Array,
    Object,
    Boolean,
    Number,
    String,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(ValueKind::Array),
            "object" => Ok(ValueKind::Object),
            "boolean" => Ok(ValueKind::Boolean),
            "number" => Ok(ValueKind::Number),
            "string" => Ok(ValueKind::String),
            other => Err(format!("unknown value kind '{}'", other)),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime kind of a value. `null`, arrays and maps all report
/// [`ValueKind::Object`]; [`ValueKind::Array`] is never returned.
pub fn kind_of(value: &Value) -> ValueKind {
    match value {
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(_) => ValueKind::Number,
        Value::String(_) => ValueKind::String,
        Value::Null | Value::Array(_) | Value::Object(_) => ValueKind::Object,
    }
}

/// JSON type name, distinguishing `null`, arrays and maps.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether `value` satisfies `expected`. `Array` requires an actual array;
/// every other kind compares against [`kind_of`].
pub fn matches_kind(value: &Value, expected: ValueKind) -> bool {
    match expected {
        ValueKind::Array => value.is_array(),
        kind => kind_of(value) == kind,
    }
}

/// Length of a string (in chars) or array (in elements).
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Short rendering used in error payloads and mismatch reports.
pub fn describe(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_is_permissive_for_containers() {
        assert_eq!(kind_of(&json!(null)), ValueKind::Object);
        assert_eq!(kind_of(&json!([1])), ValueKind::Object);
        assert_eq!(kind_of(&json!({"a": 1})), ValueKind::Object);
        assert_eq!(kind_of(&json!("x")), ValueKind::String);
        assert_eq!(kind_of(&json!(1.5)), ValueKind::Number);
        assert_eq!(json_type(&json!(null)), "null");
        assert_eq!(json_type(&json!([1])), "array");
        assert_eq!(json_type(&json!({"a": 1})), "object");
    }

    #[test]
    fn test_matches_array_needs_real_array() {
        assert!(matches_kind(&json!([]), ValueKind::Array));
        assert!(!matches_kind(&json!({}), ValueKind::Array));
        assert!(matches_kind(&json!([]), ValueKind::Object));
    }

    #[test]
    fn test_length_counts_chars() {
        assert_eq!(length_of(&json!("héllo")), Some(5));
        assert_eq!(length_of(&json!([1, 2])), Some(2));
        assert_eq!(length_of(&json!(12345)), None);
    }

    #[test]
    fn test_kind_parse_round_trip_names() {
        for name in ["array", "object", "boolean", "number", "string"] {
            assert_eq!(name.parse::<ValueKind>().unwrap().as_str(), name);
        }
        assert!("undefined".parse::<ValueKind>().is_err());
    }
}
