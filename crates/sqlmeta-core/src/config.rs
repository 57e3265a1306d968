//! Registry configuration.
//!
//! Naming conventions the registry applies when a model's schema hook leaves
//! something unset.

use serde::{Deserialize, Serialize};

/// Configuration for a [`MetadataRegistry`](crate::MetadataRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Prefix that turns a model name into its class name (default: `"model_"`).
    ///
    /// Model references carrying this prefix (in any case) are stripped of it.
    pub class_prefix: String,
    /// Connection identifier given to models that do not pick one (default: `"default"`).
    pub default_db: String,
    /// Primary-key column assumed for a foreign model that cannot be resolved
    /// (default: `"id"`).
    pub primary_key_convention: String,
    /// Whether default table names are the plural of the model name (default: `true`).
    pub pluralize_tables: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            class_prefix: "model_".to_string(),
            default_db: "default".to_string(),
            primary_key_convention: "id".to_string(),
            pluralize_tables: true,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class-name prefix.
    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the default connection identifier.
    pub fn default_db(mut self, db: impl Into<String>) -> Self {
        self.default_db = db.into();
        self
    }

    /// Set the primary-key convention name.
    pub fn primary_key_convention(mut self, name: impl Into<String>) -> Self {
        self.primary_key_convention = name.into();
        self
    }

    /// Enable/disable pluralized default table names.
    pub fn pluralize_tables(mut self, value: bool) -> Self {
        self.pluralize_tables = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.class_prefix, "model_");
        assert_eq!(config.default_db, "default");
        assert_eq!(config.primary_key_convention, "id");
        assert!(config.pluralize_tables);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"default_db": "replica"}"#).unwrap();
        assert_eq!(config.default_db, "replica");
        assert_eq!(config.class_prefix, "model_");
    }
}
