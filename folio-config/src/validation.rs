// Configuration validation

use crate::{ConfigError, Result};

/// Implemented by typed configuration sections loaded through
/// [`ConfigManager::load_validated`](crate::ConfigManager::load_validated).
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable checks for configuration values.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of [{}], got '{}'",
                field,
                allowed.join(", "),
                value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(ConfigValidator::not_empty("create", "default_group").is_ok());
        assert!(ConfigValidator::not_empty("  ", "default_group").is_err());
    }

    #[test]
    fn test_one_of_lists_allowed_values() {
        let allowed = ["collect_all", "first_failure"];
        assert!(ConfigValidator::one_of("collect_all", &allowed, "mode").is_ok());

        let err = ConfigValidator::one_of("fast", &allowed, "mode").unwrap_err();
        assert!(err.to_string().contains("collect_all, first_failure"));
    }
}
