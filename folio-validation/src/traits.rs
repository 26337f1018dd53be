// Typed DTO definitions

use crate::FieldRuleSet;
use serde_json::{Map, Value};

/// A DTO declared as a Rust type with an explicit registry identity.
///
/// ```
/// use folio_validation::{DtoDefinition, DtoRegistry, FieldRuleSet, required};
///
/// struct CreateAuthor;
///
/// impl DtoDefinition for CreateAuthor {
///     const IDENTITY: &'static str = "CreateAuthor";
///
///     fn rules() -> FieldRuleSet {
///         FieldRuleSet::new().field("name", [required("{1} is required").in_group("create")])
///     }
/// }
///
/// let registry = DtoRegistry::new();
/// registry.register_definition::<CreateAuthor>().unwrap();
/// assert!(registry.contains("CreateAuthor"));
/// ```
pub trait DtoDefinition {
    const IDENTITY: &'static str;

    fn rules() -> FieldRuleSet;

    /// Map raw input to field values before sealing. The default keeps the
    /// input as is; the registry then keeps declared fields only.
    fn construct(raw: &Map<String, Value>) -> Map<String, Value> {
        raw.clone()
    }
}
