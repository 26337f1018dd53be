// DTO registry

use crate::{
    DtoDefinition, DtoError, EngineOptions, FieldRuleSet, FieldValidationFailure, SealedDto,
    ValidationReport, ValidationResult,
};
use crate::value::json_type;
use folio_log::{debug, trace};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps raw input to field values before sealing.
pub type Constructor = Arc<dyn Fn(&Map<String, Value>) -> Map<String, Value> + Send + Sync>;

/// A registered identity with its rules and constructor.
#[derive(Clone)]
pub struct DtoDescriptor {
    identity: String,
    rules: Arc<FieldRuleSet>,
    constructor: Option<Constructor>,
}

impl DtoDescriptor {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn rules(&self) -> &Arc<FieldRuleSet> {
        &self.rules
    }

    /// Build a sealed instance from raw input. Only declared fields are
    /// kept, in declaration order; missing ones become `null`.
    pub fn build(&self, raw: &Value) -> Result<SealedDto, DtoError> {
        let input = raw.as_object().ok_or_else(|| DtoError::InvalidInput {
            identity: self.identity.clone(),
            reason: format!("expected a JSON object, got {}", json_type(raw)),
        })?;

        let constructed;
        let source = match &self.constructor {
            Some(construct) => {
                constructed = construct(input);
                &constructed
            }
            None => input,
        };

        let fields = self
            .rules
            .field_names()
            .map(|name| {
                let value = source.get(name).cloned().unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();

        Ok(SealedDto::seal(self.identity.clone(), fields))
    }
}

impl std::fmt::Debug for DtoDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtoDescriptor")
            .field("identity", &self.identity)
            .field("fields", &self.rules.field_names().collect::<Vec<_>>())
            .field("custom_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Registry of DTO descriptors keyed by explicit identity.
///
/// Populate it during startup; afterwards it is read-only and cheap to
/// share between threads (clones share the same map).
#[derive(Clone, Default)]
pub struct DtoRegistry {
    descriptors: Arc<RwLock<HashMap<String, DtoDescriptor>>>,
    options: EngineOptions,
}

impl DtoRegistry {
    /// Empty registry with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            descriptors: Arc::default(),
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Register `rules` under `identity` with the default constructor.
    pub fn register(&self, identity: impl Into<String>, rules: FieldRuleSet) -> Result<(), DtoError> {
        self.insert(identity.into(), rules, None)
    }

    /// Register `rules` under `identity` with a custom constructor.
    pub fn register_with_constructor<F>(
        &self,
        identity: impl Into<String>,
        rules: FieldRuleSet,
        constructor: F,
    ) -> Result<(), DtoError>
    where
        F: Fn(&Map<String, Value>) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.insert(identity.into(), rules, Some(Arc::new(constructor)))
    }

    /// Register a typed [`DtoDefinition`].
    pub fn register_definition<D: DtoDefinition + 'static>(&self) -> Result<(), DtoError> {
        self.insert(
            D::IDENTITY.to_string(),
            D::rules(),
            Some(Arc::new(|raw: &Map<String, Value>| D::construct(raw))),
        )
    }

    fn insert(
        &self,
        identity: String,
        rules: FieldRuleSet,
        constructor: Option<Constructor>,
    ) -> Result<(), DtoError> {
        if identity.trim().is_empty() {
            return Err(DtoError::EmptyIdentity);
        }

        let mut descriptors = self.descriptors.write();
        if descriptors.contains_key(&identity) {
            debug!(target: "folio::registry", "duplicate DTO identity {}", identity);
            return Err(DtoError::DuplicateIdentity(identity));
        }

        debug!(
            target: "folio::registry",
            "registered DTO {} with {} fields", identity, rules.len()
        );
        descriptors.insert(
            identity.clone(),
            DtoDescriptor {
                identity,
                rules: Arc::new(rules),
                constructor,
            },
        );
        Ok(())
    }

    /// Descriptor registered under `identity`.
    pub fn descriptor(&self, identity: &str) -> Result<DtoDescriptor, DtoError> {
        trace!(target: "folio::registry", "resolving {}", identity);
        self.descriptors
            .read()
            .get(identity)
            .cloned()
            .ok_or_else(|| DtoError::UnknownDto(identity.to_string()))
    }

    /// Field rules registered under `identity`.
    pub fn resolve(&self, identity: &str) -> Result<Arc<FieldRuleSet>, DtoError> {
        self.descriptor(identity).map(|d| d.rules)
    }

    /// Whether `identity` is registered.
    pub fn contains(&self, identity: &str) -> bool {
        self.descriptors.read().contains_key(identity)
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<String> {
        let mut identities: Vec<String> = self.descriptors.read().keys().cloned().collect();
        identities.sort();
        identities
    }

    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }

    /// Build a sealed instance of `identity` from raw JSON input.
    pub fn construct(&self, identity: &str, raw: &Value) -> Result<SealedDto, DtoError> {
        let dto = self.descriptor(identity)?.build(raw)?;
        trace!(target: "folio::registry", "constructed {} ({} fields)", identity, dto.len());
        Ok(dto)
    }

    /// Validate one raw field value of `identity` for `group`.
    pub fn validate_field(
        &self,
        identity: &str,
        field: &str,
        value: Option<&Value>,
        group: Option<&str>,
    ) -> Result<ValidationResult, DtoError> {
        let rules = self.resolve(identity)?;
        let group = self.options.group(group);
        let result = rules.execute(field, value, group, self.options.execution_mode);

        if let ValidationResult::Invalid(failure) = &result {
            self.log_failure(identity, group, failure);
        }
        Ok(result)
    }

    /// Validate every declared field of a sealed instance, resolving its
    /// rules through the identity it carries.
    pub fn validate(&self, dto: &SealedDto, group: Option<&str>) -> Result<ValidationReport, DtoError> {
        let rules = self.resolve(dto.identity())?;
        let group = self.options.group(group);

        let failures: Vec<FieldValidationFailure> = rules
            .iter()
            .filter_map(|field_rules| {
                match field_rules.execute(
                    dto.get(field_rules.field()),
                    group,
                    self.options.execution_mode,
                ) {
                    ValidationResult::Valid => None,
                    ValidationResult::Invalid(failure) => Some(failure),
                }
            })
            .collect();

        for failure in &failures {
            self.log_failure(dto.identity(), group, failure);
        }

        Ok(ValidationReport {
            identity: dto.identity().to_string(),
            group: group.map(str::to_string),
            failures,
        })
    }

    /// Construct and validate in one step.
    pub fn construct_validated(
        &self,
        identity: &str,
        raw: &Value,
        group: Option<&str>,
    ) -> Result<(SealedDto, ValidationReport), DtoError> {
        let dto = self.construct(identity, raw)?;
        let report = self.validate(&dto, group)?;
        Ok((dto, report))
    }

    fn log_failure(&self, identity: &str, group: Option<&str>, failure: &FieldValidationFailure) {
        if self.options.log_failures {
            debug!(
                target: "folio::validation",
                "{}.{} failed in group {}: {}",
                identity,
                failure.field,
                group.unwrap_or("<none>"),
                failure.messages().join("; ")
            );
        }
    }
}

impl std::fmt::Debug for DtoRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtoRegistry")
            .field("identities", &self.identities())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// Process-wide registry
// ============================================================================

static GLOBAL: Lazy<DtoRegistry> = Lazy::new(DtoRegistry::new);

/// The process-wide registry used by the free functions below.
pub fn global() -> &'static DtoRegistry {
    &GLOBAL
}

/// Register a DTO on the global registry.
///
/// ```
/// use folio_validation::{DtoError, FieldRuleSet, register_dto};
///
/// register_dto("CreatePublisher", FieldRuleSet::new()).unwrap();
/// assert_eq!(
///     register_dto("CreatePublisher", FieldRuleSet::new()),
///     Err(DtoError::DuplicateIdentity("CreatePublisher".to_string()))
/// );
/// ```
pub fn register_dto(identity: impl Into<String>, rules: FieldRuleSet) -> Result<(), DtoError> {
    GLOBAL.register(identity, rules)
}

/// Resolve a DTO's rules from the global registry.
pub fn resolve_dto(identity: &str) -> Result<Arc<FieldRuleSet>, DtoError> {
    GLOBAL.resolve(identity)
}

/// Validate one field against the global registry.
pub fn validate_field(
    identity: &str,
    field: &str,
    value: Option<&Value>,
    group: Option<&str>,
) -> Result<ValidationResult, DtoError> {
    GLOBAL.validate_field(identity, field, value, group)
}

/// Construct a sealed DTO through the global registry.
pub fn construct_dto(identity: &str, raw: &Value) -> Result<SealedDto, DtoError> {
    GLOBAL.construct(identity, raw)
}

/// Validate a sealed DTO against the global registry.
pub fn validate_dto(dto: &SealedDto, group: Option<&str>) -> Result<ValidationReport, DtoError> {
    GLOBAL.validate(dto, group)
}
