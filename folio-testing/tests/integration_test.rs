//! Integration tests for folio-testing

use folio_testing::*;
use folio_validation::{Comparator, Mismatch, MismatchKind};
use serde_json::{Value, json};

#[test]
fn test_nested_relational_records() {
    let categories = vec![
        json!({
            "id": 1,
            "categoryName": "Fantasy",
            "books": [{"id": 10, "title": "Tehanu", "authors": [{"id": 3, "name": "Le Guin"}]}]
        }),
        json!({
            "id": 2,
            "categoryName": "Fantasy",
            "books": [{"id": 11, "title": "Tehanu", "authors": [{"id": 3, "name": "Le Guin"}]}]
        }),
    ];

    let shape = json!({
        "categoryName": "Fantasy",
        "books": [{"title": "Tehanu", "authors": [{"name": "Le Guin"}]}]
    });

    assert_all_records_match(&categories, &shape);
}

#[test]
fn test_absent_expected_key_fails() {
    let outcome = check_record(&json!({"title": "Dune"}), &json!({"subtitle": null}));

    assert!(!outcome.passed);
    assert!(outcome.message.contains("$.subtitle"));
}

struct IgnoreEverything;

impl Comparator for IgnoreEverything {
    fn mismatch(&self, _left: Option<&Value>, _right: Option<&Value>) -> Option<Mismatch> {
        None
    }
}

struct AlwaysDifferent;

impl Comparator for AlwaysDifferent {
    fn mismatch(&self, _left: Option<&Value>, _right: Option<&Value>) -> Option<Mismatch> {
        Some(Mismatch {
            path: "$".to_string(),
            kind: MismatchKind::Value,
            left: "x".to_string(),
            right: "y".to_string(),
        })
    }
}

#[test]
fn test_custom_comparator() {
    assert!(check_record_with(&IgnoreEverything, &json!(1), &json!(2)).passed);

    let outcome = check_record_with(&AlwaysDifferent, &json!(1), &json!(1));
    assert_eq!(
        outcome.message,
        "record does not match expected shape: $: expected x, found y"
    );
}

#[test]
#[should_panic(expected = "record 0 of 1")]
fn test_assert_all_records_match_panics() {
    assert_all_records_match(&[json!({"id": 1})], &json!({"id": 2}));
}
