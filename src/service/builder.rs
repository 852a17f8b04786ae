// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent assembly of a [`ConfigStore`] from validators and sources.

use crate::adapters::MemorySource;
use crate::domain::{ConfigValue, Result};
use crate::ports::{ConfigSource, Validator};
use crate::service::ConfigStore;

/// Builder for constructing a [`ConfigStore`].
///
/// Validators are registered first, so every loaded value goes through them. Sources
/// are then loaded in ascending priority order; sources of equal priority load in the
/// order they were added. A later load overwrites an earlier one, so the highest
/// priority wins: CLI (3) over environment (2) over files (1) over defaults (0).
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
/// use treecfg::adapters::{type_validator, TypeTable};
///
/// # fn main() -> Result<()> {
/// let types = TypeTable::new()
///     .with("server.port", ValueType::Integer)?
///     .with("server.*", ValueType::String)?;
///
/// let store = StoreBuilder::new()
///     .with_validator(None, type_validator(types, false))
///     .with_value("server.port", "8080")
///     .with_value("server.host", "localhost")
///     .with_cli_args(vec!["--server.port=9090"])
///     .build()?;
///
/// assert_eq!(store.get("server.port")?, ConfigValue::Integer(9090));
/// # Ok(())
/// # }
/// ```
pub struct StoreBuilder {
    validators: Vec<(Option<String>, Box<dyn Validator>)>,
    defaults: MemorySource,
    sources: Vec<Box<dyn ConfigSource>>,
}

impl StoreBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
            defaults: MemorySource::defaults(),
            sources: Vec::new(),
        }
    }

    /// Attaches `validator` to `namespace` (`None` for the root).
    pub fn with_validator<V>(mut self, namespace: Option<&str>, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validators
            .push((namespace.map(str::to_string), Box::new(validator)));
        self
    }

    /// Adds a programmatic default (priority 0).
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.defaults.push(key, value);
        self
    }

    /// Adds a configuration source to the builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::adapters::MemorySource;
    /// use treecfg::service::StoreBuilder;
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let store = StoreBuilder::new()
    ///     .with_source(Box::new(MemorySource::new("overrides", 5).with_value("a", 1)))
    ///     .build()?;
    /// assert!(store.contains("a"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds environment variables as a configuration source.
    ///
    /// Names are lowercased and `__` separates namespaces.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(EnvVarAdapter::new().lowercase_keys(true)))
    }

    /// Adds environment variables with a prefix as a configuration source.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::service::StoreBuilder;
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let store = StoreBuilder::new()
    ///     .with_env_prefix("MYAPP_")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(
            EnvVarAdapter::with_prefix(prefix).lowercase_keys(true),
        ))
    }

    /// Adds command-line arguments as a configuration source.
    #[cfg(feature = "cli")]
    pub fn with_cli_args<S: AsRef<str>>(self, args: Vec<S>) -> Self {
        use crate::adapters::CommandLineAdapter;
        self.with_source(Box::new(CommandLineAdapter::from_args(args)))
    }

    /// Adds arguments parsed by `clap` as a configuration source.
    #[cfg(feature = "cli")]
    pub fn with_cli_matches(self, matches: &clap::ArgMatches) -> Self {
        use crate::adapters::CommandLineAdapter;
        self.with_source(Box::new(CommandLineAdapter::from_matches(matches)))
    }

    /// Adds a YAML file as a configuration source.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use treecfg::service::StoreBuilder;
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let store = StoreBuilder::new()
    ///     .with_yaml_file("/etc/myapp/config.yaml")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::YamlFileAdapter;
        let adapter = YamlFileAdapter::from_file(path)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds an INI file as a configuration source; keys of `root_sections` have no
    /// section prefix.
    #[cfg(feature = "ini")]
    pub fn with_ini_file<I, S>(
        self,
        path: impl AsRef<std::path::Path>,
        root_sections: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        use crate::adapters::IniFileAdapter;
        let adapter = IniFileAdapter::from_file(path, root_sections)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds `config.yaml` from the OS-appropriate configuration directory, if it
    /// exists and parses.
    #[cfg(feature = "yaml")]
    pub fn with_default_yaml(self, app_name: &str, qualifier: &str) -> Self {
        use crate::adapters::YamlFileAdapter;
        match YamlFileAdapter::from_default_location(app_name, qualifier) {
            Ok(adapter) => self.with_source(Box::new(adapter)),
            Err(e) => {
                tracing::debug!("No default YAML configuration for '{}': {}", app_name, e);
                self
            }
        }
    }

    /// Builds the store.
    ///
    /// # Errors
    ///
    /// Fails on the first validator that cannot be registered or the first pair that
    /// a source yields and the store refuses.
    pub fn build(self) -> Result<ConfigStore> {
        let mut store = ConfigStore::new();

        for (namespace, validator) in self.validators {
            store.register_validator(validator, namespace.as_deref(), false)?;
        }

        let mut sources = self.sources;
        if !self.defaults.is_empty() {
            sources.insert(0, Box::new(self.defaults));
        }
        // Stable, so equal priorities keep insertion order.
        sources.sort_by_key(|s| s.priority());

        for source in &sources {
            store.load_source(source.as_ref())?;
        }

        tracing::debug!(
            "Built configuration store with {} entries from {} sources",
            store.len(),
            sources.len()
        );
        Ok(store)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
