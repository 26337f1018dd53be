// Sealed DTO instances

use crate::DtoError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// A constructed DTO with a fixed field set.
///
/// Values of declared fields may change; fields can be neither added nor
/// removed. The instance carries the identity it was built under so the
/// registry can find its rules again.
#[derive(Debug, Clone, PartialEq)]
pub struct SealedDto {
    identity: String,
    fields: Vec<(String, Value)>,
}

impl SealedDto {
    pub(crate) fn seal(identity: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            identity: identity.into(),
            fields,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Replace the value of an existing field, returning the old value.
    pub fn set(&mut self, field: &str, value: Value) -> Result<Value, DtoError> {
        match self.slot(field) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(self.sealed(field, "add")),
        }
    }

    /// Take the value of an existing field, leaving `null`.
    pub fn take(&mut self, field: &str) -> Result<Value, DtoError> {
        self.set(field, Value::Null)
    }

    /// Always fails: the shape is sealed.
    pub fn insert(&mut self, field: &str, _value: Value) -> Result<(), DtoError> {
        Err(self.sealed(field, "add"))
    }

    /// Always fails: the shape is sealed.
    pub fn remove(&mut self, field: &str) -> Result<Value, DtoError> {
        Err(self.sealed(field, "remove"))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }

    fn slot(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    fn sealed(&self, field: &str, operation: &'static str) -> DtoError {
        DtoError::SealedShape {
            identity: self.identity.clone(),
            field: field.to_string(),
            operation,
        }
    }
}

impl Serialize for SealedDto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book() -> SealedDto {
        SealedDto::seal(
            "CreateBook",
            vec![
                ("title".to_string(), json!("Dune")),
                ("isbn".to_string(), json!("9780441013593")),
            ],
        )
    }

    #[test]
    fn test_existing_fields_are_mutable() {
        let mut dto = book();
        let old = dto.set("title", json!("Dune Messiah")).unwrap();

        assert_eq!(old, json!("Dune"));
        assert_eq!(dto.get("title"), Some(&json!("Dune Messiah")));
        assert_eq!(dto.take("isbn").unwrap(), json!("9780441013593"));
        assert_eq!(dto.get("isbn"), Some(&Value::Null));
        assert_eq!(dto.len(), 2);
    }

    #[test]
    fn test_shape_is_sealed() {
        let mut dto = book();

        assert!(matches!(
            dto.set("pages", json!(412)),
            Err(DtoError::SealedShape { operation: "add", .. })
        ));
        assert!(dto.insert("pages", json!(412)).is_err());
        assert!(matches!(
            dto.remove("title"),
            Err(DtoError::SealedShape { operation: "remove", .. })
        ));
        assert_eq!(dto.field_names().collect::<Vec<_>>(), vec!["title", "isbn"]);
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let json = serde_json::to_string(&book()).unwrap();
        assert_eq!(json, r#"{"title":"Dune","isbn":"9780441013593"}"#);
        assert_eq!(book().to_json()["isbn"], "9780441013593");
    }
}
