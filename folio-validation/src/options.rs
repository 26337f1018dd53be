// Engine options

use crate::ExecutionMode;
#[cfg(feature = "config")]
use folio_config::{ConfigError, ConfigManager, ConfigValidator, Validate};
use serde::{Deserialize, Serialize};

/// Tunables of a [`DtoRegistry`](crate::DtoRegistry).
///
/// Loaded from the `validation` configuration section:
///
/// | key | env | default |
/// |-----|-----|---------|
/// | `validation.execution_mode` | `FOLIO_VALIDATION_EXECUTION_MODE` | `collect_all` |
/// | `validation.log_failures` | `FOLIO_VALIDATION_LOG_FAILURES` | `false` |
/// | `validation.default_group` | `FOLIO_VALIDATION_DEFAULT_GROUP` | none |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub execution_mode: ExecutionMode,
    /// Log every failing field at debug level.
    pub log_failures: bool,
    /// Group used when a caller passes none.
    pub default_group: Option<String>,
}

impl EngineOptions {
    pub const SECTION: &'static str = "validation";

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = Some(group.into());
        self
    }

    pub fn with_log_failures(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }

    /// Read the `validation` section, falling back to defaults for missing keys.
    #[cfg(feature = "config")]
    pub fn from_config(config: &ConfigManager) -> folio_config::Result<Self> {
        let key = |name: &str| format!("{}.{}", Self::SECTION, name);
        let mut options = Self::default();

        if config.has(&key("execution_mode")) {
            let raw = config.get_string(&key("execution_mode"))?;
            let normalized = raw.trim().to_lowercase().replace('-', "_");
            ConfigValidator::one_of(&normalized, &ExecutionMode::NAMES, &key("execution_mode"))?;
            options.execution_mode = normalized
                .parse()
                .map_err(ConfigError::ValidationError)?;
        }

        if config.has(&key("log_failures")) {
            options.log_failures = config.get_flag(&key("log_failures"))?;
        }

        if config.has(&key("default_group")) {
            options.default_group = Some(config.get_string(&key("default_group"))?);
        }

        options.validate()?;
        Ok(options)
    }

    pub(crate) fn group<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.or(self.default_group.as_deref())
    }
}

#[cfg(feature = "config")]
impl Validate for EngineOptions {
    fn validate(&self) -> folio_config::Result<()> {
        match &self.default_group {
            Some(group) => ConfigValidator::not_empty(group, "validation.default_group"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_fallback() {
        let options = EngineOptions::default().with_default_group("create");
        assert_eq!(options.group(None), Some("create"));
        assert_eq!(options.group(Some("update")), Some("update"));
        assert_eq!(EngineOptions::default().group(None), None);
    }

    #[test]
    fn test_builders() {
        let options = EngineOptions::default()
            .with_execution_mode(ExecutionMode::FirstFailure)
            .with_log_failures(true);

        assert_eq!(options.execution_mode, ExecutionMode::FirstFailure);
        assert!(options.log_failures);
        assert_eq!(options.default_group, None);
    }
}
