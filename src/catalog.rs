//! Book catalog DTOs.
//!
//! | identity | group |
//! |----------|-------|
//! | `CreateBook` | `create` |
//! | `UpdateBook` | `update` |
//! | `CreateCategory` | `create` |
//! | `UpdateCategory` | `update` |

use crate::{
    DtoDefinition, DtoError, DtoRegistry, FieldRuleSet, RuleOptions, ValueKind, fixed_length,
    in_range, is_array_with, is_boolean, is_type, max_length, min_length, required,
};
use serde_json::{Map, Value};

pub const CREATE: &str = "create";
pub const UPDATE: &str = "update";

const ISBN_LENGTH: usize = 13;

/// Trim surrounding whitespace from string values.
fn trim_strings(raw: &Map<String, Value>) -> Map<String, Value> {
    raw.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn author_ids(group: &str) -> RuleOptions {
    RuleOptions::group(group).allow_one_element()
}

pub struct CreateBook;

impl DtoDefinition for CreateBook {
    const IDENTITY: &'static str = "CreateBook";

    fn rules() -> FieldRuleSet {
        FieldRuleSet::new()
            .field(
                "title",
                [
                    required("{1} is required").in_group(CREATE),
                    max_length(255, "{1} must be at most {2} characters").optional(),
                ],
            )
            .field(
                "isbn",
                [
                    required("{1} is required").in_group(CREATE),
                    fixed_length(ISBN_LENGTH, "{1} must be exactly {2} characters").optional(),
                ],
            )
            .field(
                "authorIds",
                [is_array_with(
                    Some(ValueKind::Number),
                    "{1} must be an array of {2} ids",
                    author_ids(CREATE),
                )],
            )
            .field(
                "categoryId",
                [is_type(ValueKind::Number, "{1} must be a {2}").optional()],
            )
            .field(
                "available",
                [is_boolean("{1} must be a boolean").optional()],
            )
    }

    fn construct(raw: &Map<String, Value>) -> Map<String, Value> {
        trim_strings(raw)
    }
}

pub struct UpdateBook;

impl DtoDefinition for UpdateBook {
    const IDENTITY: &'static str = "UpdateBook";

    fn rules() -> FieldRuleSet {
        FieldRuleSet::new()
            .field("id", [is_type(ValueKind::Number, "{1} must be a {2}").in_group(UPDATE)])
            .field(
                "title",
                [min_length(1, "{1} must not be empty").optional()],
            )
            .field(
                "isbn",
                [fixed_length(ISBN_LENGTH, "{1} must be exactly {2} characters").optional()],
            )
            .field(
                "authorIds",
                [is_array_with(
                    Some(ValueKind::Number),
                    "{1} must be an array of {2} ids",
                    author_ids(UPDATE),
                )
                .optional()],
            )
            .field(
                "categoryId",
                [is_type(ValueKind::Number, "{1} must be a {2}").optional()],
            )
            .field(
                "available",
                [is_boolean("{1} must be a boolean").optional()],
            )
    }

    fn construct(raw: &Map<String, Value>) -> Map<String, Value> {
        trim_strings(raw)
    }
}

pub struct CreateCategory;

impl DtoDefinition for CreateCategory {
    const IDENTITY: &'static str = "CreateCategory";

    fn rules() -> FieldRuleSet {
        FieldRuleSet::new()
            .field(
                "categoryName",
                [
                    required("{1} is required").in_group(CREATE),
                    max_length(100, "{1} must be at most {2} characters").optional(),
                ],
            )
            .field(
                "position",
                [in_range(0.0, 1000.0, "{1} must be between {2} and {3}").optional()],
            )
    }

    fn construct(raw: &Map<String, Value>) -> Map<String, Value> {
        trim_strings(raw)
    }
}

pub struct UpdateCategory;

impl DtoDefinition for UpdateCategory {
    const IDENTITY: &'static str = "UpdateCategory";

    fn rules() -> FieldRuleSet {
        FieldRuleSet::new()
            .field("id", [is_type(ValueKind::Number, "{1} must be a {2}").in_group(UPDATE)])
            .field(
                "categoryName",
                [
                    required("{1} is required").in_group(CREATE),
                    max_length(100, "{1} must be at most {2} characters").optional(),
                ],
            )
            .field(
                "position",
                [in_range(0.0, 1000.0, "{1} must be between {2} and {3}").optional()],
            )
    }

    fn construct(raw: &Map<String, Value>) -> Map<String, Value> {
        trim_strings(raw)
    }
}

/// Register the four catalog DTOs.
pub fn register_catalog(registry: &DtoRegistry) -> Result<(), DtoError> {
    registry.register_definition::<CreateBook>()?;
    registry.register_definition::<UpdateBook>()?;
    registry.register_definition::<CreateCategory>()?;
    registry.register_definition::<UpdateCategory>()?;
    Ok(())
}
