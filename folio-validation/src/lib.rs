//! Declarative field validation for Folio
//!
//! Rules are small, immutable checks built by the functions in this crate
//! (`required`, `fixed_length`, `is_array`, ...). They are attached to the
//! fields of a DTO, registered under a unique identity, and executed per
//! field and per validation group.
//!
//! # Examples
//!
//! ## Field Rules
//!
//! ```
//! use folio_validation::{ExecutionMode, FieldRuleSet, fixed_length, required};
//! use serde_json::json;
//!
//! let rules = FieldRuleSet::new()
//!     .field("categoryName", [required("{1} is required").in_group("create")])
//!     .field("isbn", [fixed_length(13, "{1} must be exactly {2} characters")]);
//!
//! let result = rules.execute("categoryName", Some(&json!("")), Some("create"), ExecutionMode::CollectAll);
//! assert_eq!(result.messages(), vec!["categoryName is required"]);
//!
//! let result = rules.execute("categoryName", Some(&json!("")), Some("update"), ExecutionMode::CollectAll);
//! assert!(result.is_valid());
//! ```
//!
//! ## DTO Registry
//!
//! ```
//! use folio_validation::{DtoRegistry, FieldRuleSet, is_boolean};
//! use serde_json::json;
//!
//! let registry = DtoRegistry::new();
//! registry
//!     .register("UpdateBook", FieldRuleSet::new().field("available", [is_boolean("{1} must be a boolean")]))
//!     .unwrap();
//!
//! let dto = registry.construct("UpdateBook", &json!({"available": "yes", "extra": 1})).unwrap();
//! assert!(!dto.contains("extra"));
//!
//! let report = registry.validate(&dto, None).unwrap();
//! assert!(report.is_valid());
//! ```
//!
//! ## Deep Equality
//!
//! ```
//! use folio_validation::values_equal;
//! use serde_json::json;
//!
//! assert!(values_equal(&json!({"id": 1}), &json!({"id": 1, "title": "Dune"})));
//! assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
//! ```

mod dto;
mod equality;
mod errors;
mod format;
mod options;
mod pipe;
mod registry;
mod rules;
mod traits;
mod validators;
mod value;

pub use dto::SealedDto;
pub use equality::{
    Comparator, DeepEquality, Mismatch, MismatchKind, deep_equal, find_mismatch, values_equal,
};
pub use errors::*;
pub use format::{MessageFormatter, format_message, placeholders};
pub use options::EngineOptions;
pub use pipe::*;
pub use registry::{
    Constructor, DtoDescriptor, DtoRegistry, construct_dto, global, register_dto, resolve_dto,
    validate_dto, validate_field,
};
pub use rules::*;
pub use traits::*;
pub use validators::*;
pub use value::{ValueKind, describe, json_type, kind_of, length_of, matches_kind};
