// Folio - declarative DTO validation for book catalog services
//
// This library re-exports the validation engine together with logging,
// configuration and testing support, and ships the catalog DTOs.

pub mod catalog;

// Re-export the validation engine
pub use folio_validation::*;

pub use folio_log;

#[cfg(feature = "config")]
pub use folio_config;

#[cfg(feature = "testing")]
pub use folio_testing;

/// Build a registry with the catalog DTOs, configured from the `validation`
/// section of `config`.
#[cfg(feature = "config")]
pub fn registry_from_config(
    config: &folio_config::ConfigManager,
) -> Result<DtoRegistry, Box<dyn std::error::Error + Send + Sync>> {
    let options = EngineOptions::from_config(config)?;
    let registry = DtoRegistry::with_options(options);
    catalog::register_catalog(&registry)?;
    Ok(registry)
}

// Prelude for common imports
pub mod prelude {
    pub use crate::catalog::{CREATE, UPDATE, register_catalog};
    pub use crate::{
        DtoDefinition, DtoError, DtoRegistry, EngineOptions, ExecutionMode, FieldRuleSet, Rule,
        RuleOptions, SealedDto, ValidationPipe, ValidationReport, ValidationResult, ValueKind,
        deep_equal, format_message, values_equal,
    };
}
