// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration source adapter.
//!
//! This module provides an adapter that reads configuration values from YAML files.
//! Nested mappings are flattened into dotted keys; scalars keep their YAML type.

use crate::adapters::file::{default_config_path, read_canonical, read_config_file};
use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::{ConfigParser, ConfigSource, Entry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// YAML parser implementation.
///
/// This parser converts YAML documents into ordered `(key, value)` pairs using dot
/// notation for nested mappings. Numbers, booleans and nulls keep their type, and
/// sequences become [`ConfigValue::List`].
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::YamlParser;
/// use treecfg::domain::ConfigValue;
/// use treecfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(result[0], ("database.host".to_string(), ConfigValue::from("localhost")));
/// assert_eq!(result[1], ("database.port".to_string(), ConfigValue::Integer(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens mappings into dotted keys, converting everything else into a value.
    fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, result: &mut Vec<Entry>) {
        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let Some(key_str) = Self::key_string(key) else {
                        tracing::debug!("Skipping non-scalar YAML key under '{}'", prefix);
                        continue;
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            other => result.push((prefix.to_string(), Self::to_value(other))),
        }
    }

    fn key_string(key: &serde_yaml::Value) -> Option<String> {
        match key {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn to_value(value: &serde_yaml::Value) -> ConfigValue {
        match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(*b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigValue::String(s.clone()),
            serde_yaml::Value::Sequence(seq) => {
                ConfigValue::List(seq.iter().map(Self::to_value).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigValue::Map(
                map.iter()
                    .filter_map(|(k, v)| Self::key_string(k).map(|k| (k, Self::to_value(v))))
                    .collect::<BTreeMap<_, _>>(),
            ),
            serde_yaml::Value::Tagged(tagged) => Self::to_value(&tagged.value),
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Vec<Entry>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match value {
            serde_yaml::Value::Null => Ok(Vec::new()),
            serde_yaml::Value::Mapping(_) => {
                let mut result = Vec::new();
                Self::flatten_yaml(&value, "", &mut result);
                Ok(result)
            }
            _ => Err(ConfigError::ParseError {
                message: "YAML document must be a mapping".to_string(),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Configuration source adapter for YAML files.
///
/// This adapter reads configuration values from YAML files. It supports automatic
/// discovery of configuration files in OS-appropriate locations, as well as custom
/// file paths.
///
/// # Priority
///
/// YAML files have a priority of 1, which means they are overridden by both
/// environment variables (priority 2) and command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::adapters::YamlFileAdapter;
///
/// // Load from a specific file
/// let adapter = YamlFileAdapter::from_file("/path/to/config.yaml").unwrap();
///
/// // Load from default OS location
/// let adapter = YamlFileAdapter::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Path to the YAML file
    file_path: PathBuf,
    /// Parsed pairs, in document order
    entries: Vec<Entry>,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Creates a new YAML file adapter from a specific file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let parser = YamlParser::new();
        let (file_path, content) = read_config_file("yaml-file", path.as_ref())?;
        let entries = parser.parse(&content)?;

        Ok(Self {
            file_path,
            entries,
            parser,
        })
    }

    /// Creates a new YAML file adapter from `config.yaml` in the default
    /// OS-appropriate location.
    ///
    /// This method uses the `directories` crate to determine the appropriate
    /// configuration directory for the current operating system.
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Creates a new YAML file adapter with a custom file name in the default location.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let path = default_config_path("yaml-file", app_name, qualifier, filename)?;
        Self::from_file(path)
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl ConfigSource for YamlFileAdapter {
    fn name(&self) -> &str {
        "yaml-file"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.clone())
    }

    fn reload(&mut self) -> Result<()> {
        let content = read_canonical("yaml-file", &self.file_path)?;
        self.entries = self.parser.parse(&content)?;
        Ok(())
    }
}
