// Record assertions

use folio_validation::{Comparator, DeepEquality};
use serde::Serialize;
use serde_json::Value;

/// Result of a non-panicking record check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionOutcome {
    pub passed: bool,
    pub message: String,
}

impl AssertionOutcome {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Check `actual` against the `expected` shape with the default comparator.
pub fn check_record(actual: &Value, expected: &Value) -> AssertionOutcome {
    check_record_with(&DeepEquality, actual, expected)
}

/// Check `actual` against `expected` with a custom comparator. The expected
/// shape is passed as the left-hand side.
pub fn check_record_with(
    comparator: &dyn Comparator,
    actual: &Value,
    expected: &Value,
) -> AssertionOutcome {
    match comparator.mismatch(Some(expected), Some(actual)) {
        None => AssertionOutcome::pass("record matches expected shape"),
        Some(mismatch) => {
            AssertionOutcome::fail(format!("record does not match expected shape: {}", mismatch))
        }
    }
}

/// Check every record of `actuals` against the same `expected` shape.
/// Reports the first failing index. An empty collection passes.
pub fn check_records(actuals: &[Value], expected: &Value) -> AssertionOutcome {
    for (index, actual) in actuals.iter().enumerate() {
        if let Some(mismatch) = DeepEquality.mismatch(Some(expected), Some(actual)) {
            return AssertionOutcome::fail(format!(
                "record {} of {} does not match expected shape: {}",
                index,
                actuals.len(),
                mismatch
            ));
        }
    }

    AssertionOutcome::pass(format!("all {} records match expected shape", actuals.len()))
}

/// Serialize any record type for use with the checks above.
pub fn to_record<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).expect("Failed to serialize record")
}

/// Assert that `actual` matches the `expected` shape
pub fn assert_record_matches(actual: &Value, expected: &Value) {
    let outcome = check_record(actual, expected);
    assert!(outcome.passed, "{}", outcome.message);
}

/// Assert that every record matches the `expected` shape
pub fn assert_all_records_match(actuals: &[Value], expected: &Value) {
    let outcome = check_records(actuals, expected);
    assert!(outcome.passed, "{}", outcome.message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_record_subset() {
        let actual = json!({"id": 1, "title": "Dune", "available": true});

        assert!(check_record(&actual, &json!({"title": "Dune"})).passed);
        assert!(!check_record(&actual, &json!({"title": "Dune", "pages": 412})).passed);
    }

    #[test]
    fn test_check_record_message() {
        let outcome = check_record(&json!({"tags": ["a"]}), &json!({"tags": ["a", "b"]}));

        assert!(!outcome.passed);
        assert_eq!(
            outcome.message,
            "record does not match expected shape: $.tags: expected 2 elements, found 1"
        );
    }

    #[test]
    fn test_check_records() {
        let records = vec![
            json!({"id": 1, "categoryId": 3}),
            json!({"id": 2, "categoryId": 4}),
        ];

        let outcome = check_records(&records, &json!({"categoryId": 3}));
        assert!(!outcome.passed);
        assert!(outcome.message.starts_with("record 1 of 2"));

        assert!(check_records(&[], &json!({"categoryId": 3})).passed);
    }

    #[test]
    fn test_to_record() {
        #[derive(Serialize)]
        struct Book {
            title: &'static str,
        }

        assert_record_matches(&to_record(&Book { title: "Emma" }), &json!({"title": "Emma"}));
    }

    #[test]
    #[should_panic(expected = "$.name")]
    fn test_assert_record_matches_panics() {
        assert_record_matches(&json!({"name": "a"}), &json!({"name": "b"}));
    }
}
