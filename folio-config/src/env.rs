// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;

/// Reads process environment variables, optionally restricted to a prefix.
///
/// With prefix `FOLIO`, `FOLIO_EXECUTION_MODE` is exposed as
/// `execution_mode`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Collect matching variables with normalized (lower-case) keys.
    pub fn load(&self) -> HashMap<String, String> {
        env::vars()
            .filter_map(|(key, value)| self.strip(&key).map(|k| (k, value)))
            .collect()
    }

    fn strip(&self, key: &str) -> Option<String> {
        match &self.prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|rest| !rest.is_empty())
                .map(str::to_lowercase),
            None => Some(key.to_lowercase()),
        }
    }

    /// Full variable name for a logical key.
    pub fn var_name(&self, key: &str) -> String {
        let key = key.replace('.', "_").to_uppercase();
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key,
        }
    }

    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.var_name(key)).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
