//! Mapper configuration, loadable from JSON

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_AUTO_CLASS_MAPS, DEFAULT_MAP_NULLS, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::property::NameMatching;
use crate::support::TracingLevel;

const fn default_auto_class_maps() -> bool { DEFAULT_AUTO_CLASS_MAPS }

const fn default_map_nulls() -> bool { DEFAULT_MAP_NULLS }

const fn default_max_depth() -> usize { DEFAULT_MAX_DEPTH }

/// Settings applied by a `MapperFactory` when it is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MapperConfig {
    /// How property names are compared by class-map builders
    #[serde(default)]
    pub name_matching:   NameMatching,
    /// Build a default class map for pairs that have none registered
    #[serde(default = "default_auto_class_maps")]
    pub auto_class_maps: bool,
    /// Write null source values into the destination
    #[serde(default = "default_map_nulls")]
    pub map_nulls:       bool,
    /// Deepest nesting of mapping calls within one top-level call
    #[serde(default = "default_max_depth")]
    pub max_depth:       usize,
    /// Tracing level to apply when the factory is built
    ///
    /// The level is process-wide: building another factory with a different
    /// level replaces it for every factory. `None` leaves it untouched.
    #[serde(default)]
    pub tracing_level:   Option<TracingLevel>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            name_matching:   NameMatching::default(),
            auto_class_maps: DEFAULT_AUTO_CLASS_MAPS,
            map_nulls:       DEFAULT_MAP_NULLS,
            max_depth:       DEFAULT_MAX_DEPTH,
            tracing_level:   None,
        }
    }
}

impl MapperConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid("mapper config", e).into())
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::cannot(&format!("read mapper config {}", path.display()), e))?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), ?config, "Loaded mapper config");
        Ok(config)
    }

    /// JSON schema describing the config file
    pub fn json_schema() -> serde_json::Value { schemars::schema_for!(Self).to_value() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = MapperConfig::from_json_str(r#"{"name_matching": "case_insensitive"}"#).unwrap();
        assert_eq!(config.name_matching, NameMatching::CaseInsensitive);
        assert!(config.auto_class_maps);
        assert!(config.map_nulls);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.tracing_level, None);
    }

    #[test]
    fn test_unknown_fields_are_configuration_errors() {
        let error = MapperConfig::from_json_str(r#"{"max_dpeth": 3}"#).unwrap_err();
        assert!(error.current_context().is_configuration());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"map_nulls": false, "max_depth": 4, "tracing_level": "debug"}}"#).unwrap();

        let config = MapperConfig::from_file(file.path()).unwrap();
        assert!(!config.map_nulls);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.tracing_level, Some(TracingLevel::Debug));

        let missing = MapperConfig::from_file(file.path().with_extension("missing")).unwrap_err();
        assert!(missing.current_context().is_configuration());
    }

    #[test]
    fn test_schema_lists_every_field() {
        let schema = MapperConfig::json_schema();
        let properties = schema["properties"].as_object().unwrap();
        for field in [
            "name_matching",
            "auto_class_maps",
            "map_nulls",
            "max_depth",
            "tracing_level",
        ] {
            assert!(properties.contains_key(field), "schema lacks {field}");
        }
    }
}
