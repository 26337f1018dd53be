//! Configuration management for Folio.
//!
//! Values are gathered from environment variables, `.env` files and
//! JSON/TOML/env documents into one flat key space. Keys are normalized to
//! lower-case with `_` separators, so the TOML entry
//! `[validation] execution_mode = ...` and the variable
//! `FOLIO_VALIDATION_EXECUTION_MODE` address the same key,
//! `validation_execution_mode`.

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use folio_log::debug;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Default environment prefix.
pub const DEFAULT_PREFIX: &str = "FOLIO";

/// Normalize a configuration key.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace(['.', '-'], "_").to_lowercase()
}

/// Layered configuration store. Later loads override earlier ones.
#[derive(Clone)]
pub struct ConfigManager {
    values: Arc<RwLock<HashMap<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            env_prefix: None,
        }
    }

    /// Manager whose lookups fall back to `<PREFIX>_<KEY>` variables.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Copy matching environment variables into the store.
    pub fn load_env(&self) -> Result<()> {
        let vars = EnvLoader::new(self.env_prefix.clone()).load();
        let count = vars.len();

        let mut values = self.values.write();
        for (key, value) in vars {
            values.insert(normalize_key(&key), Value::String(value));
        }

        debug!(target: "folio::config", "loaded {} environment values", count);
        Ok(())
    }

    /// Load a `.env` file into the process environment, then [`load_env`](Self::load_env).
    /// Without a path a missing `.env` is not an error.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Load a file, detecting its format from the extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = ConfigLoader::auto(path)?.load_file(path)?;
        self.merge_value(data);
        debug!(target: "folio::config", "loaded configuration file {}", path.display());
        Ok(())
    }

    /// Parse and merge an in-memory document.
    pub fn load_str(&self, content: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).parse(content)?;
        self.merge_value(data);
        Ok(())
    }

    fn merge_value(&self, data: Value) {
        let mut flat = HashMap::new();
        if let Value::Object(map) = data {
            for (key, value) in map {
                flatten_into(&mut flat, &normalize_key(&key), value);
            }
        }

        self.values.write().extend(flat);
    }

    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.values.write().insert(normalize_key(key), json_value);
        Ok(())
    }

    /// Raw value for `key`, consulting the prefixed environment last.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let key = normalize_key(key);
        if let Some(value) = self.values.read().get(&key) {
            return Some(value.clone());
        }

        self.env_prefix.as_ref().and_then(|prefix| {
            EnvLoader::new(Some(prefix.clone()))
                .load_var(&key)
                .ok()
                .map(Value::String)
        })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .get_value(key)
            .ok_or_else(|| ConfigError::KeyNotFound(normalize_key(key)))?;

        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError {
            key: normalize_key(key),
            message: e.to_string(),
        })
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// String value; scalars are rendered without quotes.
    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.get_value(key) {
            Some(Value::String(s)) => Ok(s),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(_) => Err(ConfigError::DeserializationError {
                key: normalize_key(key),
                message: "expected a scalar".to_string(),
            }),
            None => Err(ConfigError::KeyNotFound(normalize_key(key))),
        }
    }

    /// Boolean that also accepts the strings `1`/`0`/`true`/`false`/`yes`/`no`,
    /// since environment values are always strings.
    pub fn get_flag(&self, key: &str) -> Result<bool> {
        match self.get_value(key) {
            Some(Value::Bool(b)) => Ok(b),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(ConfigError::DeserializationError {
                    key: normalize_key(key),
                    message: format!("'{}' is not a boolean", other),
                }),
            },
            Some(Value::Number(n)) => Ok(n.as_i64() != Some(0)),
            Some(_) => Err(ConfigError::DeserializationError {
                key: normalize_key(key),
                message: "expected a boolean".to_string(),
            }),
            None => Err(ConfigError::KeyNotFound(normalize_key(key))),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Copy every value of `other` over this store.
    pub fn merge(&self, other: &ConfigManager) {
        let snapshot = other.values.read().clone();
        self.values.write().extend(snapshot);
    }

    /// Deserialize the keys under `section` (e.g. `validation`) into `T`
    /// and run its checks. Keys are matched with the section prefix removed.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self, section: &str) -> Result<T> {
        let prefix = format!("{}_", normalize_key(section));
        let object: serde_json::Map<String, Value> = self
            .values
            .read()
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(&prefix).map(|k| (k.to_string(), v.clone())))
            .collect();

        let typed: T = serde_json::from_value(Value::Object(object)).map_err(|e| {
            ConfigError::DeserializationError {
                key: normalize_key(section),
                message: e.to_string(),
            }
        })?;

        typed.validate()?;
        Ok(typed)
    }
}

fn flatten_into(out: &mut HashMap<String, Value>, key: &str, value: Value) {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                flatten_into(out, &format!("{}_{}", key, normalize_key(&child)), value);
            }
        }
        other => {
            out.insert(key.to_string(), other);
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("validation.default_group", "create").unwrap();

        let value: String = manager.get("validation_default_group").unwrap();
        assert_eq!(value, "create");
    }

    #[test]
    fn test_get_or_default() {
        let manager = ConfigManager::new();
        let value: String = manager.get_or("missing_key", "fallback".to_string());
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_nested_tables_are_flattened() {
        let manager = ConfigManager::new();
        manager
            .load_str(
                "[validation]\nexecution_mode = \"first_failure\"\n",
                FileFormat::Toml,
            )
            .unwrap();

        assert!(manager.has("validation.execution_mode"));
        assert_eq!(
            manager.get_string("validation_execution_mode").unwrap(),
            "first_failure"
        );
    }

    #[test]
    fn test_get_flag_accepts_strings() {
        let manager = ConfigManager::new();
        manager.set("a", "yes").unwrap();
        manager.set("b", "0").unwrap();
        manager.set("c", true).unwrap();
        manager.set("d", "maybe").unwrap();

        assert!(manager.get_flag("a").unwrap());
        assert!(!manager.get_flag("b").unwrap());
        assert!(manager.get_flag("c").unwrap());
        assert!(manager.get_flag("d").is_err());
        assert!(matches!(manager.get_flag("e"), Err(ConfigError::KeyNotFound(_))));
    }

    #[test]
    fn test_merge_overrides() {
        let base = ConfigManager::new();
        base.set("mode", "collect_all").unwrap();
        let overlay = ConfigManager::new();
        overlay.set("mode", "first_failure").unwrap();

        base.merge(&overlay);
        assert_eq!(base.get_string("mode").unwrap(), "first_failure");
        assert_eq!(base.keys(), vec!["mode".to_string()]);
    }

    #[derive(serde::Deserialize)]
    struct Section {
        name: String,
    }

    impl Validate for Section {
        fn validate(&self) -> Result<()> {
            ConfigValidator::not_empty(&self.name, "name")
        }
    }

    #[test]
    fn test_load_validated_section() {
        let manager = ConfigManager::new();
        manager.set("catalog.name", "books").unwrap();
        manager.set("other.name", "").unwrap();

        let section: Section = manager.load_validated("catalog").unwrap();
        assert_eq!(section.name, "books");

        assert!(matches!(
            manager.load_validated::<Section>("other"),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
