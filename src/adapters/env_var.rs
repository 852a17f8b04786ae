// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! This module provides an adapter that reads configuration values from
//! environment variables.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::{ConfigSource, Entry};
use std::collections::{BTreeMap, HashMap};
use std::env;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Separator that marks a namespace boundary in a variable name.
const NESTING_SEPARATOR: &str = "__";

/// Configuration source adapter for environment variables.
///
/// This adapter reads configuration values from environment variables. It supports
/// optional prefix filtering (e.g., only read variables starting with "APP_") and
/// key transformation: names can be lowercased, and a double underscore (`__`) turns
/// into the `.` namespace separator, so `APP_DATABASE__HOST` becomes `database.host`
/// once the prefix is stripped and the name lowercased. Single underscores are kept.
///
/// Values are always strings. The environment is read each time
/// [`entries`](ConfigSource::entries) is called.
///
/// # Priority
///
/// Environment variables have a priority of 2, which means they override configuration
/// files (priority 1) but are overridden by command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::EnvVarAdapter;
///
/// // Read all environment variables
/// let adapter = EnvVarAdapter::new();
///
/// // Read only variables with a specific prefix, as lowercase keys
/// let adapter = EnvVarAdapter::with_prefix("APP_").lowercase_keys(true);
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarAdapter {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Whether to convert keys to lowercase
    lowercase_keys: bool,
    /// Whether `__` becomes `.`
    nest_keys: bool,
    /// Fixed values used instead of the process environment
    fixed: Option<Vec<Entry>>,
}

impl EnvVarAdapter {
    /// Creates a new environment variable adapter without prefix filtering.
    ///
    /// This will read all environment variables available to the process.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            nest_keys: true,
            fixed: None,
        }
    }

    /// Creates a new environment variable adapter with prefix filtering.
    ///
    /// Only environment variables starting with the given prefix will be read.
    /// The prefix is stripped from the key when storing values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::adapters::EnvVarAdapter;
    ///
    /// let adapter = EnvVarAdapter::with_prefix("MYAPP_");
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Sets whether to convert keys to lowercase.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Sets whether a double underscore in a name becomes the `.` separator.
    ///
    /// Enabled by default.
    pub fn nest_keys(mut self, enabled: bool) -> Self {
        self.nest_keys = enabled;
        self
    }

    /// Creates an adapter with pre-populated values for testing.
    ///
    /// **Note**: This method is primarily intended for testing and should not
    /// be used in production code. Use `new()` or `with_prefix()` for normal usage.
    ///
    /// The keys are used as given; no prefix or transformation is applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::adapters::EnvVarAdapter;
    /// use treecfg::ports::ConfigSource;
    /// use std::collections::HashMap;
    ///
    /// let mut values = HashMap::new();
    /// values.insert("test.key".to_string(), "test_value".to_string());
    ///
    /// let adapter = EnvVarAdapter::with_values(values);
    /// assert_eq!(adapter.entries().unwrap().len(), 1);
    /// ```
    pub fn with_values(values: HashMap<String, String>) -> Self {
        let sorted: BTreeMap<String, String> = values.into_iter().collect();
        Self {
            fixed: Some(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k, ConfigValue::String(v)))
                    .collect(),
            ),
            ..Self::new()
        }
    }

    /// Turns a variable name into a key, or `None` if the variable is filtered out.
    fn transform_key(&self, name: &str) -> Option<String> {
        let name = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str())?,
            None => name,
        };

        let mut key = if self.lowercase_keys {
            name.to_lowercase()
        } else {
            name.to_string()
        };
        if self.nest_keys {
            key = key.replace(NESTING_SEPARATOR, ".");
        }
        Some(key)
    }

    /// Applies filtering and key transformation to `vars`, sorted by key.
    fn collect<I>(&self, vars: I) -> Vec<Entry>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut collected = BTreeMap::new();

        for (name, value) in vars {
            // Validate input sizes to prevent DoS
            if name.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    name.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            let Some(key) = self.transform_key(&name) else {
                continue;
            };
            // Names such as `__CF_USER_TEXT_ENCODING` leave an empty segment behind.
            if ConfigKey::parse(key.as_str()).is_err() {
                tracing::debug!(
                    "Skipping environment variable '{}': '{}' is not a valid key",
                    name,
                    key
                );
                continue;
            }
            collected.insert(key, ConfigValue::String(value));
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?}, lowercase={}, nest={})",
            collected.len(),
            self.prefix,
            self.lowercase_keys,
            self.nest_keys
        );

        collected.into_iter().collect()
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        match &self.fixed {
            Some(values) => Ok(values.clone()),
            // Variables that are not valid unicode are skipped.
            None => Ok(self.collect(env::vars_os().filter_map(|(k, v)| {
                Some((k.into_string().ok()?, v.into_string().ok()?))
            }))),
        }
    }

    fn reload(&mut self) -> Result<()> {
        // The process environment is read on every call to `entries`.
        Ok(())
    }
}
