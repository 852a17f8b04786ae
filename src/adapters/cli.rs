// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.
//!
//! This module provides an adapter that reads configuration values from
//! command-line arguments, either raw (`--key value`) or already parsed by `clap`.

use crate::domain::{ConfigValue, Result};
use crate::ports::{ConfigSource, Entry};
use std::collections::BTreeMap;

/// Configuration source adapter for command-line arguments.
///
/// This adapter reads configuration values from command-line arguments. It supports
/// multiple argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
/// - `-k value`: Short form with space-separated value
///
/// Raw arguments always produce string values. When a key is given more than once
/// the last value wins.
///
/// # Priority
///
/// Command-line arguments have the highest priority (3), which means they override
/// both environment variables (priority 2) and configuration files (priority 1).
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::CommandLineAdapter;
/// use treecfg::domain::ConfigValue;
/// use treecfg::ports::ConfigSource;
///
/// let args = vec!["--database.host=localhost", "--port", "5432"];
/// let adapter = CommandLineAdapter::from_args(args);
/// let entries = adapter.entries().unwrap();
/// assert_eq!(entries[0], ("database.host".to_string(), ConfigValue::from("localhost")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    /// Parsed configuration values
    values: BTreeMap<String, ConfigValue>,
}

impl CommandLineAdapter {
    /// Creates a new command-line adapter with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new command-line adapter from a vector of arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::adapters::CommandLineAdapter;
    ///
    /// let args = vec!["--database.host=localhost", "--port", "5432"];
    /// let adapter = CommandLineAdapter::from_args(args);
    /// assert_eq!(adapter.len(), 2);
    /// ```
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut adapter = Self::new();
        adapter.parse_args(&args);
        adapter
    }

    /// Creates a new command-line adapter from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    ///
    /// ```rust,no_run
    /// use treecfg::adapters::CommandLineAdapter;
    ///
    /// let adapter = CommandLineAdapter::from_env_args();
    /// ```
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Creates an adapter from arguments already parsed by `clap`.
    ///
    /// Each argument given explicitly (on the command line or through a `clap` env
    /// binding) becomes one pair keyed by the argument id. Argument groups are
    /// skipped. Arguments that only carry
    /// their clap default are skipped so they cannot override lower-priority sources.
    /// Values are typed as bool, then `i64`, then string; multi-valued arguments become
    /// a list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clap::{value_parser, Arg, Command};
    /// use treecfg::adapters::CommandLineAdapter;
    /// use treecfg::domain::ConfigValue;
    /// use treecfg::ports::ConfigSource;
    ///
    /// let matches = Command::new("app")
    ///     .arg(Arg::new("server.port").long("port").value_parser(value_parser!(i64)))
    ///     .get_matches_from(["app", "--port", "8080"]);
    ///
    /// let adapter = CommandLineAdapter::from_matches(&matches);
    /// assert_eq!(
    ///     adapter.entries().unwrap(),
    ///     vec![("server.port".to_string(), ConfigValue::Integer(8080))]
    /// );
    /// ```
    #[cfg(feature = "cli")]
    pub fn from_matches(matches: &clap::ArgMatches) -> Self {
        use clap::parser::ValueSource;

        let mut adapter = Self::new();
        for id in matches.ids() {
            let id = id.as_str();
            // Group ids hold the ids of their present members, not values.
            if let Ok(Some(_)) = matches.try_get_many::<clap::Id>(id) {
                continue;
            }
            match matches.value_source(id) {
                None | Some(ValueSource::DefaultValue) => continue,
                Some(_) => {}
            }
            match typed_match(matches, id) {
                Some(value) => {
                    adapter.values.insert(id.to_string(), value);
                }
                None => tracing::debug!("Skipping command-line argument '{}' without value", id),
            }
        }
        adapter
    }

    /// Returns the number of parsed pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no pair was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses command-line arguments and populates the values map.
    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();

            // --key=value
            if let Some((key, value)) = arg.strip_prefix("--").and_then(|s| s.split_once('=')) {
                self.insert(key, value);
                i += 1;
                continue;
            }

            // --key value, or -k value (single character short form)
            let key = match arg.strip_prefix("--") {
                Some(long) => Some(long),
                None if arg.len() == 2 => arg.strip_prefix('-'),
                None => None,
            };
            let Some(key) = key else {
                i += 1;
                continue;
            };

            match args.get(i + 1).map(AsRef::as_ref) {
                // Make sure the next argument is not another flag
                Some(next) if !next.starts_with('-') => {
                    self.insert(key, next);
                    i += 2;
                }
                _ => i += 1,
            }
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), ConfigValue::from(value));
    }
}

#[cfg(feature = "cli")]
fn typed_match(matches: &clap::ArgMatches, id: &str) -> Option<ConfigValue> {
    if let Ok(Some(flag)) = matches.try_get_one::<bool>(id) {
        return Some(ConfigValue::Bool(*flag));
    }
    if let Ok(Some(number)) = matches.try_get_one::<i64>(id) {
        return Some(ConfigValue::Integer(*number));
    }
    if let Ok(Some(values)) = matches.try_get_many::<String>(id) {
        let mut values: Vec<ConfigValue> = values.map(|v| ConfigValue::from(v.as_str())).collect();
        return if values.len() == 1 {
            values.pop()
        } else {
            Some(ConfigValue::List(values))
        };
    }

    // Values parsed into some other type still have their raw form.
    let raw: Vec<ConfigValue> = matches
        .try_get_raw(id)
        .ok()
        .flatten()?
        .map(|v| ConfigValue::from(v.to_string_lossy().into_owned()))
        .collect();
    match raw.len() {
        0 => None,
        1 => raw.into_iter().next(),
        _ => Some(ConfigValue::List(raw)),
    }
}

impl ConfigSource for CommandLineAdapter {
    fn name(&self) -> &str {
        "cli"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        Ok(self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn reload(&mut self) -> Result<()> {
        // Command-line arguments don't change during runtime
        Ok(())
    }
}
