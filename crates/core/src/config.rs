//! Reconciliation configuration.
//!
//! A [`ReconcileConfig`] is built once and reused across calls. It can be
//! assembled in code through the consuming builder methods, or loaded from
//! a TOML file in which converters are referenced by built-in coercion
//! name:
//!
//! ```toml
//! debug = false
//!
//! [[mapping]]
//! source = "userName"
//! target = "username"
//!
//! [[converters]]
//! field = "age"
//! coercion = "number"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::convert::{Coercion, Converter, ConverterRegistry};
use crate::errors::{ConfigError, ConvertError};
use crate::mapping::{FieldMap, FieldPair};

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Static configuration for the reconciliation engine.
#[derive(Debug, Default)]
pub struct ReconcileConfig {
    /// Ordered source -> target field mapping.
    pub field_map: FieldMap,
    /// Converters keyed by source field name.
    pub converters: ConverterRegistry,
    /// Gates the engine's structured diff logging.
    pub debug: bool,
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a source -> target field correspondence. Call order is the
    /// order the merge step applies pairs in.
    pub fn map_field(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.field_map.push(source.into(), target.into());
        self
    }

    /// Register a converter for a source field. Accepts a closure or a
    /// boxed [`Converter`].
    pub fn converter<F>(mut self, field: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        self.converters.register_fn(field, converter);
        self
    }

    /// Enable or disable the engine's debug logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading reconciliation config");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        let data: ConfigFileData =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        data.into_config()
    }
}

// ---------------------------------------------------------------------------
// On-disk structure
// ---------------------------------------------------------------------------

/// The TOML configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFileData {
    /// Gates the engine's structured diff logging.
    #[serde(default)]
    pub debug: bool,

    /// `[[mapping]]` entries, in file order.
    #[serde(default)]
    pub mapping: Vec<FieldPair>,

    /// `[[converters]]` entries naming built-in coercions.
    #[serde(default)]
    pub converters: Vec<ConverterEntry>,
}

/// A single `[[converters]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterEntry {
    /// Source field the coercion applies to.
    pub field: String,
    /// Built-in coercion name: `number`, `string`, or `boolean`.
    pub coercion: String,
}

impl ConfigFileData {
    /// Resolve coercion names and build the runtime configuration.
    pub fn into_config(self) -> Result<ReconcileConfig, ConfigError> {
        let mut registry = ConverterRegistry::new();
        for entry in &self.converters {
            let coercion =
                Coercion::from_name(&entry.coercion).ok_or_else(|| ConfigError::UnknownCoercion {
                    field: entry.field.clone(),
                    name: entry.coercion.clone(),
                })?;
            let converter: Converter = coercion.into_converter();
            registry.register(entry.field.clone(), converter);
        }

        debug!(
            mappings = self.mapping.len(),
            converters = self.converters.len(),
            "reconciliation config resolved"
        );

        Ok(ReconcileConfig {
            field_map: FieldMap::from_pairs(self.mapping),
            converters: registry,
            debug: self.debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_methods() {
        let config = ReconcileConfig::new()
            .map_field("userName", "username")
            .converter("age", |v| Ok(v.clone()))
            .with_debug(true);

        assert_eq!(config.field_map.to_target("userName"), "username");
        assert!(config.converters.contains("age"));
        assert!(config.debug);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recordrecon.toml");
        let content = r#"
debug = true

[[mapping]]
source = "userName"
target = "username"

[[mapping]]
source = "zip"
target = "postal_code"

[[converters]]
field = "age"
coercion = "number"
"#;
        std::fs::write(&path, content).unwrap();

        let config = ReconcileConfig::load_from_file(&path).unwrap();
        assert!(config.debug);
        assert_eq!(config.field_map.len(), 2);
        assert_eq!(config.field_map.to_target("zip"), "postal_code");
        assert!(config.converters.contains("age"));

        let converter = config.converters.get("age").unwrap();
        assert_eq!(converter(&json!("30")).unwrap(), json!(30));
    }

    #[test]
    fn test_mapping_order_matches_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recordrecon.toml");
        let content = r#"
[[mapping]]
source = "z"
target = "last"

[[mapping]]
source = "a"
target = "first"
"#;
        std::fs::write(&path, content).unwrap();

        let config = ReconcileConfig::load_from_file(&path).unwrap();
        let sources: Vec<&str> = config
            .field_map
            .pairs()
            .iter()
            .map(|p| p.source.as_str())
            .collect();
        assert_eq!(sources, vec!["z", "a"]);
    }

    #[test]
    fn test_load_nonexistent() {
        let result = ReconcileConfig::load_from_file("/nonexistent/recordrecon.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_unknown_coercion_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recordrecon.toml");
        let content = r#"
[[converters]]
field = "age"
coercion = "integerish"
"#;
        std::fs::write(&path, content).unwrap();

        let result = ReconcileConfig::load_from_file(&path);
        assert!(matches!(
            result,
            Err(ConfigError::UnknownCoercion { .. })
        ));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = ReconcileConfig::load_from_file(&path).unwrap();
        assert!(!config.debug);
        assert!(config.field_map.is_empty());
        assert!(config.converters.is_empty());
    }
}
