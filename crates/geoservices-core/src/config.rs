use crate::error::{GeoservicesError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Identifier field used when a dataset does not declare one
pub const DEFAULT_ID_FIELD: &str = "OBJECTID";

/// Length advertised for string fields in statistics responses
pub const DEFAULT_STRING_FIELD_LENGTH: u32 = 254;

/// Upper bound on features returned by a single engine query
pub const DEFAULT_MAX_RECORD_COUNT: usize = 2000;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Resolved settings consumed by the query interpreter and engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Identifier field used when dataset metadata has no `idField`
    pub id_field: String,

    /// `length` reported for `esriFieldTypeString` statistics fields
    pub string_field_length: u32,

    /// Maximum number of features an engine returns per query
    pub max_record_count: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            string_field_length: DEFAULT_STRING_FIELD_LENGTH,
            max_record_count: DEFAULT_MAX_RECORD_COUNT,
        }
    }
}

/// Layered configuration for Geoservices
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub id_field: ConfigValue<String>,
    pub string_field_length: ConfigValue<u32>,
    pub max_record_count: ConfigValue<usize>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            id_field: ConfigValue::new(DEFAULT_ID_FIELD.to_string(), ConfigSource::Default),
            string_field_length: ConfigValue::new(
                DEFAULT_STRING_FIELD_LENGTH,
                ConfigSource::Default,
            ),
            max_record_count: ConfigValue::new(DEFAULT_MAX_RECORD_COUNT, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoservicesError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoservicesError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(id_field) = file_config.id_field {
            self.id_field.update(parse_id_field(&id_field)?, ConfigSource::File);
        }

        if let Some(length) = file_config.string_field_length {
            self.string_field_length.update(length, ConfigSource::File);
        }

        if let Some(max) = file_config.max_record_count {
            self.max_record_count.update(parse_max_record_count(&max.to_string())?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOSERVICES_ID_FIELD
        if let Ok(id_field) = env::var("GEOSERVICES_ID_FIELD") {
            match parse_id_field(&id_field) {
                Ok(field) => self.id_field.update(field, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSERVICES_ID_FIELD value '{}': expected a non-empty field name",
                    id_field
                ),
            }
        }

        // GEOSERVICES_STRING_FIELD_LENGTH
        if let Ok(length_str) = env::var("GEOSERVICES_STRING_FIELD_LENGTH") {
            match length_str.parse::<u32>() {
                Ok(length) => self.string_field_length.update(length, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSERVICES_STRING_FIELD_LENGTH value '{}': expected positive integer",
                    length_str
                ),
            }
        }

        // GEOSERVICES_MAX_RECORD_COUNT
        if let Ok(max_str) = env::var("GEOSERVICES_MAX_RECORD_COUNT") {
            match parse_max_record_count(&max_str) {
                Ok(max) => self.max_record_count.update(max, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSERVICES_MAX_RECORD_COUNT value '{}': expected integer greater than zero",
                    max_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(id_field) = overrides.id_field {
            self.id_field.update(id_field, ConfigSource::Cli);
        }

        if let Some(length) = overrides.string_field_length {
            self.string_field_length.update(length, ConfigSource::Cli);
        }

        if let Some(max) = overrides.max_record_count {
            self.max_record_count.update(max, ConfigSource::Cli);
        }
    }

    /// Collapse the layers into the plain settings used at query time
    pub fn resolve(&self) -> QueryConfig {
        QueryConfig {
            id_field: self.id_field.value.clone(),
            string_field_length: self.string_field_length.value,
            max_record_count: self.max_record_count.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("id_field".to_string(), (self.id_field.value.clone(), self.id_field.source));

        map.insert(
            "string_field_length".to_string(),
            (self.string_field_length.value.to_string(), self.string_field_length.source),
        );

        map.insert(
            "max_record_count".to_string(),
            (self.max_record_count.value.to_string(), self.max_record_count.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    id_field: Option<String>,
    string_field_length: Option<u32>,
    max_record_count: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub id_field: Option<String>,
    pub string_field_length: Option<u32>,
    pub max_record_count: Option<usize>,
}

/// Parse an identifier field name
pub fn parse_id_field(s: &str) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(GeoservicesError::ConfigInvalid {
            key: "id_field".to_string(),
            reason: "Field name must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a maximum record count
pub fn parse_max_record_count(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(GeoservicesError::ConfigInvalid {
            key: "max_record_count".to_string(),
            reason: format!("Invalid record count: {}. Use an integer greater than zero", s),
        }),
        Ok(max) => Ok(max),
    }
}
