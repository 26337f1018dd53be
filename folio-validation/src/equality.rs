//! Deep structural equality over JSON values.
//!
//! The comparison is driven by the left-hand value: for maps, only keys of
//! the left side are checked, so `{"id": 1}` matches `{"id": 1, "title": ..}`
//! but not the other way round. Arrays are compared element-wise, in order,
//! and must have the same length.

use crate::value::describe;
use serde_json::{Number, Value};
use std::fmt;

/// Why two values differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    /// Present on one side only.
    Missing,
    /// Different kinds (e.g. array vs map).
    Kind,
    /// Arrays of different length.
    Length { left: usize, right: usize },
    /// Same kind, different scalar value.
    Value,
}

/// First difference found by [`find_mismatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// JSONPath-like location, `$` for the root.
    pub path: String,
    pub kind: MismatchKind,
    pub left: String,
    pub right: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MismatchKind::Length { left, right } => write!(
                f,
                "{}: expected {} elements, found {}",
                self.path, left, right
            ),
            _ => write!(
                f,
                "{}: expected {}, found {}",
                self.path, self.left, self.right
            ),
        }
    }
}

/// Structural comparison strategy.
pub trait Comparator: Send + Sync {
    fn mismatch(&self, left: Option<&Value>, right: Option<&Value>) -> Option<Mismatch>;

    fn equals(&self, left: Option<&Value>, right: Option<&Value>) -> bool {
        self.mismatch(left, right).is_none()
    }
}

/// The default, left-driven deep equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepEquality;

impl Comparator for DeepEquality {
    fn mismatch(&self, left: Option<&Value>, right: Option<&Value>) -> Option<Mismatch> {
        find_mismatch(left, right)
    }
}

/// `true` when `right` matches `left` structurally. `None` is an absent
/// value; it only equals another absent value.
pub fn deep_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    find_mismatch(left, right).is_none()
}

/// [`deep_equal`] for two present values.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    deep_equal(Some(left), Some(right))
}

pub fn find_mismatch(left: Option<&Value>, right: Option<&Value>) -> Option<Mismatch> {
    compare("$".to_string(), left, right)
}

fn mismatch(path: String, kind: MismatchKind, left: Option<&Value>, right: Option<&Value>) -> Option<Mismatch> {
    Some(Mismatch {
        path,
        kind,
        left: describe(left),
        right: describe(right),
    })
}

fn compare(path: String, left: Option<&Value>, right: Option<&Value>) -> Option<Mismatch> {
    let (l, r) = match (left, right) {
        (None, None) => return None,
        (Some(l), Some(r)) => (l, r),
        _ => return mismatch(path, MismatchKind::Missing, left, right),
    };

    match (l, r) {
        (Value::Null, Value::Null) => None,
        (Value::Array(ls), Value::Array(rs)) => {
            if ls.len() != rs.len() {
                return mismatch(
                    path,
                    MismatchKind::Length {
                        left: ls.len(),
                        right: rs.len(),
                    },
                    left,
                    right,
                );
            }
            ls.iter()
                .zip(rs)
                .enumerate()
                .find_map(|(i, (a, b))| compare(format!("{}[{}]", path, i), Some(a), Some(b)))
        }
        (Value::Object(lm), Value::Object(rm)) => lm
            .iter()
            .find_map(|(key, a)| compare(format!("{}.{}", path, key), Some(a), rm.get(key))),
        (Value::Number(a), Value::Number(b)) => {
            if numbers_equal(a, b) {
                None
            } else {
                mismatch(path, MismatchKind::Value, left, right)
            }
        }
        (Value::Bool(_), Value::Bool(_)) | (Value::String(_), Value::String(_)) => {
            if l == r {
                None
            } else {
                mismatch(path, MismatchKind::Value, left, right)
            }
        }
        _ => mismatch(path, MismatchKind::Kind, left, right),
    }
}

/// Integers compare exactly; anything involving a float compares as `f64`.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        a.as_f64() == b.as_f64()
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subset_of_keys() {
        let subject = json!({"id": 1, "title": "Dune"});
        let expected = json!({"id": 1, "title": "Dune", "pages": 412});

        assert!(values_equal(&subject, &expected));
        assert!(!values_equal(&expected, &subject));
        assert!(!values_equal(&subject, &json!({"id": 1, "title": "Emma"})));
    }

    #[test]
    fn test_arrays_are_ordered() {
        assert!(values_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!values_equal(&json!([1, 2, 3]), &json!([3, 2, 1])));
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn test_absent_and_null() {
        assert!(deep_equal(None, None));
        assert!(!deep_equal(None, Some(&Value::Null)));
        assert!(!deep_equal(Some(&json!(0)), None));
        assert!(values_equal(&Value::Null, &Value::Null));
        assert!(!values_equal(&Value::Null, &json!({})));
        assert!(!values_equal(&json!({"a": null}), &json!({})));
    }

    #[test]
    fn test_scalars_are_strict() {
        assert!(values_equal(&json!(0), &json!(0)));
        assert!(values_equal(&json!(""), &json!("")));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!(false), &json!(0)));
        assert!(values_equal(&json!(1), &json!(1.0)));
    }

    #[test]
    fn test_kind_mismatch() {
        assert!(!values_equal(&json!([]), &json!({})));
        let m = find_mismatch(Some(&json!({"a": []})), Some(&json!({"a": {}}))).unwrap();
        assert_eq!(m.kind, MismatchKind::Kind);
        assert_eq!(m.path, "$.a");
    }

    #[test]
    fn test_mismatch_path_in_nested_records() {
        let expected = json!({
            "name": "Le Guin",
            "books": [{"title": "The Dispossessed"}, {"title": "Lavinia"}]
        });
        let actual = json!({
            "id": 3,
            "name": "Le Guin",
            "books": [{"id": 1, "title": "The Dispossessed"}, {"id": 2, "title": "Tehanu"}]
        });

        let m = find_mismatch(Some(&expected), Some(&actual)).unwrap();
        assert_eq!(m.path, "$.books[1].title");
        assert_eq!(m.to_string(), "$.books[1].title: expected \"Lavinia\", found \"Tehanu\"");
    }

    #[test]
    fn test_length_mismatch_display() {
        let m = find_mismatch(Some(&json!([1])), Some(&json!([1, 2]))).unwrap();
        assert_eq!(m.kind, MismatchKind::Length { left: 1, right: 2 });
        assert_eq!(m.to_string(), "$: expected 1 elements, found 2");
    }

    #[test]
    fn test_comparator_trait() {
        let cmp: &dyn Comparator = &DeepEquality;
        assert!(cmp.equals(Some(&json!({"a": [1]})), Some(&json!({"a": [1], "b": 2}))));
    }
}
