// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted configuration key newtype.
//!
//! This module provides the `ConfigKey` type, a validated wrapper around `String` for
//! dot-separated paths such as `database.pool.size`. A key always has at least one
//! segment and no segment is empty, so every structural operation on the store can
//! split on `.` without re-checking the input.

use crate::domain::errors::{ConfigError, Result};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// The segment separator used by all keys.
pub const SEPARATOR: char = '.';

/// A validated, dot-separated configuration key.
///
/// `ConfigKey` can only be obtained through [`ConfigKey::parse`] (or the equivalent
/// `TryFrom`/`FromStr` impls), which rejects empty keys and empty segments.
///
/// # Examples
///
/// ```
/// use treecfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::parse("database.host").unwrap();
/// assert_eq!(key.as_str(), "database.host");
/// assert_eq!(key.last_segment(), "host");
///
/// assert!(ConfigKey::parse("").is_err());
/// assert!(ConfigKey::parse("database..host").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Parses and validates a key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] if the key is empty or has an empty segment.
    pub fn parse(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::invalid_key(key, "key must not be empty"));
        }
        if key.split(SEPARATOR).any(str::is_empty) {
            return Err(ConfigError::invalid_key(key, "key has an empty segment"));
        }
        Ok(ConfigKey(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Iterates over the segments of the key, outermost first.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::parse("a.b.c").unwrap();
    /// assert_eq!(key.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Returns the trailing segment.
    pub fn last_segment(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Returns the immediate parent namespace, or `None` for a top-level key.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind(SEPARATOR).map(|idx| &self.0[..idx])
    }

    /// Iterates over the strict ancestor namespaces, most specific first.
    ///
    /// The root namespace is not included.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::parse("a.b.c").unwrap();
    /// assert_eq!(key.ancestors().collect::<Vec<_>>(), vec!["a.b", "a"]);
    /// ```
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.0.rmatch_indices(SEPARATOR).map(move |(idx, _)| &self.0[..idx])
    }
}

impl TryFrom<&str> for ConfigKey {
    type Error = ConfigError;

    fn try_from(s: &str) -> Result<Self> {
        ConfigKey::parse(s)
    }
}

impl TryFrom<String> for ConfigKey {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self> {
        ConfigKey::parse(s)
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::parse(s)
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ConfigKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
