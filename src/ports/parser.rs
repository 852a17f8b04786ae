// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing configuration files in different formats (INI, YAML, etc.) into the
//! ordered `(key, value)` pairs the store ingests.

use crate::domain::Result;
use crate::ports::source::Entry;

/// A trait for parsing configuration files.
///
/// Parsers flatten nested structures using dot notation. For example, a YAML
/// structure like:
///
/// ```yaml
/// database:
///   host: localhost
///   port: 5432
/// ```
///
/// Should be parsed into:
/// - `database.host` -> `"localhost"`
/// - `database.port` -> `5432`
///
/// The order of the returned pairs follows the order of the document.
///
/// # Examples
///
/// ```rust
/// use treecfg::ports::{ConfigParser, Entry};
/// use treecfg::domain::{ConfigValue, Result};
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<Vec<Entry>> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once(' '))
///             .map(|(k, v)| (k.to_string(), ConfigValue::from(v)))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let pairs = LineParser.parse("a.b 1\nc 2").unwrap();
/// assert_eq!(pairs[0].0, "a.b");
/// ```
pub trait ConfigParser {
    /// Parses configuration content into ordered `(key, value)` pairs.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Entry>)` - The parsed configuration, in document order
    /// * `Err(ConfigError)` - An error occurred during parsing
    fn parse(&self, content: &str) -> Result<Vec<Entry>>;

    /// Returns the file extensions supported by this parser.
    ///
    /// A slice of file extensions (without the leading dot) that this parser supports.
    fn supported_extensions(&self) -> &[&str];
}
