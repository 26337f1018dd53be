// Validation outcomes and registry errors

use std::fmt;
use thiserror::Error;

/// One failing rule on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Rendered message
    pub message: String,

    /// Constraint name of the failing rule
    pub constraint: String,

    /// Offending value, rendered as JSON (`undefined` when absent)
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
            value: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "field": self.field,
            "message": self.message,
            "constraint": self.constraint,
            "value": self.value,
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All failing rules of a single field, in declaration order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationFailure {
    pub field: String,
    pub errors: Vec<ValidationError>,
}

impl FieldValidationFailure {
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

/// Verdict for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(FieldValidationFailure),
}

impl ValidationResult {
    pub(crate) fn from_errors(field: &str, errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(FieldValidationFailure {
                field: field.to_string(),
                errors,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Rendered messages; empty when valid.
    pub fn messages(&self) -> Vec<&str> {
        match self {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid(failure) => failure.messages(),
        }
    }

    pub fn failure(&self) -> Option<&FieldValidationFailure> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(failure) => Some(failure),
        }
    }
}

/// Flat list of validation errors across fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(ValidationError::to_json).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

/// Outcome of validating every field of a sealed DTO for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub identity: String,
    pub group: Option<String>,
    pub failures: Vec<FieldValidationFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, field: &str) -> Option<&FieldValidationFailure> {
        self.failures.iter().find(|f| f.field == field)
    }

    pub fn errors(&self) -> ValidationErrors {
        self.failures
            .iter()
            .flat_map(|f| f.errors.iter().cloned())
            .collect::<Vec<_>>()
            .into()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors())
        }
    }
}

/// Structural errors of the DTO registry. These are programming errors,
/// unlike validation failures which are returned as values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DtoError {
    #[error("DTO identity already registered: {0}")]
    DuplicateIdentity(String),

    #[error("Unknown DTO: {0}")]
    UnknownDto(String),

    #[error("DTO identity must not be empty")]
    EmptyIdentity,

    #[error("Cannot {operation} field '{field}' on sealed {identity}")]
    SealedShape {
        identity: String,
        field: String,
        operation: &'static str,
    },

    #[error("Invalid input for {identity}: {reason}")]
    InvalidInput { identity: String, reason: String },
}
