// Built-in rule builders
//
// Every builder returns a `Rule` applying to all groups. Scope it with
// `.in_group(..)`, or pass `RuleOptions` to the `_with` variants.

use crate::value::{kind_of, length_of, matches_kind};
use crate::{Rule, RuleOptions, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

fn as_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

fn as_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

// Shape checks

/// Array whose elements all match `expected` (any array when `None`).
pub fn is_array(expected: Option<ValueKind>, message: impl Into<String>) -> Rule {
    is_array_with(expected, message, RuleOptions::default())
}

/// [`is_array`] with options. With `allowed_one_element`, a non-array value
/// passes when it matches `expected` itself.
pub fn is_array_with(
    expected: Option<ValueKind>,
    message: impl Into<String>,
    options: RuleOptions,
) -> Rule {
    let allow_single = options.allowed_one_element;
    let params = expected.map(|k| k.as_str()).unwrap_or("any");

    Rule::new("isArray", message, move |value| match value {
        Some(Value::Array(items)) => match expected {
            Some(kind) => items.iter().all(|item| matches_kind(item, kind)),
            None => true,
        },
        Some(single) if allow_single => match expected {
            Some(kind) => matches_kind(single, kind),
            None => false,
        },
        _ => false,
    })
    .with_params([params])
    .with_options(&options)
}

/// Native boolean, or exactly the string `"true"` or `"false"`.
pub fn is_boolean(message: impl Into<String>) -> Rule {
    Rule::new("isBoolean", message, |value| match value {
        Some(Value::Bool(_)) => true,
        Some(Value::String(s)) => s == "true" || s == "false",
        _ => false,
    })
}

/// Runtime kind "object". Arrays and `null` pass as well; use
/// [`is_object_strict`] to accept maps only.
pub fn is_object(message: impl Into<String>) -> Rule {
    Rule::new("isObject", message, |value| {
        value.is_some_and(|v| kind_of(v) == ValueKind::Object)
    })
}

pub fn is_object_strict(message: impl Into<String>) -> Rule {
    Rule::new("isObjectStrict", message, |value| {
        value.is_some_and(Value::is_object)
    })
}

/// Runtime kind equals `kind` (`Array` requires a real array).
pub fn is_type(kind: ValueKind, message: impl Into<String>) -> Rule {
    Rule::new("isType", message, move |value| {
        value.is_some_and(|v| matches_kind(v, kind))
    })
    .with_params([kind])
}

// Presence and length

/// Present, not `null`, not an empty string and not an empty array.
pub fn required(message: impl Into<String>) -> Rule {
    Rule::new("required", message, |value| match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    })
}

/// String or array whose length is exactly `limit`.
pub fn fixed_length(limit: usize, message: impl Into<String>) -> Rule {
    Rule::new("fixedLength", message, move |value| {
        value.and_then(length_of) == Some(limit)
    })
    .with_params([limit])
}

pub fn min_length(min: usize, message: impl Into<String>) -> Rule {
    Rule::new("minLength", message, move |value| {
        value.and_then(length_of).is_some_and(|len| len >= min)
    })
    .with_params([min])
}

pub fn max_length(max: usize, message: impl Into<String>) -> Rule {
    Rule::new("maxLength", message, move |value| {
        value.and_then(length_of).is_some_and(|len| len <= max)
    })
    .with_params([max])
}

// String formats

pub fn is_email(message: impl Into<String>) -> Rule {
    Rule::new("isEmail", message, |value| {
        as_str(value).is_some_and(|s| EMAIL_REGEX.is_match(s))
    })
}

pub fn is_url(message: impl Into<String>) -> Rule {
    Rule::new("isUrl", message, |value| {
        as_str(value).is_some_and(|s| URL_REGEX.is_match(s))
    })
}

pub fn is_uuid(message: impl Into<String>) -> Rule {
    Rule::new("isUuid", message, |value| {
        as_str(value).is_some_and(|s| UUID_REGEX.is_match(s))
    })
}

/// String made of ASCII digits only.
pub fn is_numeric_string(message: impl Into<String>) -> Rule {
    Rule::new("isNumericString", message, |value| {
        as_str(value).is_some_and(|s| NUMERIC_REGEX.is_match(s))
    })
}

pub fn matches(pattern: Regex, message: impl Into<String>) -> Rule {
    let source = pattern.as_str().to_string();
    Rule::new("matches", message, move |value| {
        as_str(value).is_some_and(|s| pattern.is_match(s))
    })
    .with_params([source])
}

// Values

/// Equal to one of `allowed` (compared as JSON values).
pub fn one_of(allowed: Vec<Value>, message: impl Into<String>) -> Rule {
    let listed = allowed
        .iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect::<Vec<_>>()
        .join(", ");

    Rule::new("oneOf", message, move |value| {
        value.is_some_and(|v| allowed.contains(v))
    })
    .with_params([listed])
}

pub fn min(min: f64, message: impl Into<String>) -> Rule {
    Rule::new("min", message, move |value| {
        as_number(value).is_some_and(|n| n >= min)
    })
    .with_params([min])
}

pub fn max(max: f64, message: impl Into<String>) -> Rule {
    Rule::new("max", message, move |value| {
        as_number(value).is_some_and(|n| n <= max)
    })
    .with_params([max])
}

/// Number within `[min, max]`.
pub fn in_range(min: f64, max: f64, message: impl Into<String>) -> Rule {
    Rule::new("inRange", message, move |value| {
        as_number(value).is_some_and(|n| n >= min && n <= max)
    })
    .with_params([min, max])
}

/// Caller-supplied predicate.
pub fn custom<F>(constraint: impl Into<String>, message: impl Into<String>, check: F) -> Rule
where
    F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
{
    Rule::new(constraint, message, check)
}
