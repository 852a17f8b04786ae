// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in typed validator.
//!
//! A [`TypeValidator`] checks each key against a [`TypeTable`] of exact keys and glob
//! patterns, and casts the value into the declared [`ValueType`]. It is the usual way to
//! turn the strings produced by file and command-line loaders into typed values.

use crate::domain::{cast_value, ConfigError, ConfigKey, ConfigValue, Rejection, Result, ValueType};
use crate::ports::Validator;
use globset::{Glob, GlobMatcher};
use std::collections::HashMap;

/// Characters that make a pattern a glob rather than an exact key.
const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Maps key patterns to expected types.
///
/// Exact keys are looked up first. Glob patterns (`*`, `?`, `[...]`, `{a,b}`) are then
/// tried in insertion order, and the first match wins. `*` also matches across `.`.
///
/// # Examples
///
/// ```
/// use treecfg::adapters::TypeTable;
/// use treecfg::domain::ValueType;
///
/// let table = TypeTable::new()
///     .with("server.port", ValueType::Integer).unwrap()
///     .with("server.*", ValueType::NonEmptyString).unwrap();
///
/// assert_eq!(table.lookup("server.port"), Some(ValueType::Integer));
/// assert_eq!(table.lookup("server.host"), Some(ValueType::NonEmptyString));
/// assert_eq!(table.lookup("client.host"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    exact: HashMap<String, ValueType>,
    patterns: Vec<(String, GlobMatcher, ValueType)>,
}

impl TypeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(pattern, type)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if a glob pattern is malformed.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ValueType)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (pattern, expected) in pairs {
            table.insert(pattern.as_ref(), expected)?;
        }
        Ok(table)
    }

    /// Adds a rule, consuming and returning the table.
    pub fn with(mut self, pattern: &str, expected: ValueType) -> Result<Self> {
        self.insert(pattern, expected)?;
        Ok(self)
    }

    /// Adds a rule. Re-adding a pattern replaces its type but keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if a glob pattern is malformed.
    pub fn insert(&mut self, pattern: &str, expected: ValueType) -> Result<()> {
        if !pattern.contains(GLOB_CHARS) {
            self.exact.insert(pattern.to_string(), expected);
            return Ok(());
        }

        if let Some(rule) = self.patterns.iter_mut().find(|(p, _, _)| p == pattern) {
            rule.2 = expected;
            return Ok(());
        }

        let matcher = Glob::new(pattern)
            .map_err(|e| ConfigError::ParseError {
                message: format!("invalid key pattern '{}': {}", pattern, e),
                source: Some(Box::new(e)),
            })?
            .compile_matcher();
        self.patterns.push((pattern.to_string(), matcher, expected));
        Ok(())
    }

    /// Returns the expected type for `key`, if any rule matches.
    pub fn lookup(&self, key: &str) -> Option<ValueType> {
        self.exact.get(key).copied().or_else(|| {
            self.patterns
                .iter()
                .find(|(_, matcher, _)| matcher.is_match(key))
                .map(|(_, _, expected)| *expected)
        })
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.exact.len() + self.patterns.len()
    }

    /// Returns true if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A validator that enforces a [`TypeTable`].
///
/// For each key:
///
/// * no rule matches: the value passes through unchanged when `relaxed`, otherwise it is
///   rejected with [`Rejection::NoMatchingRule`];
/// * a rule matches: the value is cast with [`cast_value`], and a failed cast is
///   rejected with [`Rejection::Cast`]. With casting turned off the value must already
///   have the declared type, or it is rejected with [`Rejection::TypeMismatch`].
///
/// # Examples
///
/// ```
/// use treecfg::prelude::*;
/// use treecfg::adapters::{type_validator, TypeTable};
///
/// # fn main() -> Result<()> {
/// let table = TypeTable::new().with("count", ValueType::Integer)?;
/// let mut store = ConfigStore::new();
/// store.set_validator(type_validator(table, false), None, true)?;
///
/// store.set("count", "8")?;
/// assert_eq!(store.get("count")?, ConfigValue::Integer(8));
/// assert!(store.set("other", "x").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TypeValidator {
    table: TypeTable,
    relaxed: bool,
    cast: bool,
}

impl TypeValidator {
    /// Creates a casting, non-relaxed validator for `table`.
    pub fn new(table: TypeTable) -> Self {
        Self {
            table,
            relaxed: false,
            cast: true,
        }
    }

    /// Sets whether keys without a rule pass through unchanged.
    pub fn relaxed(mut self, relaxed: bool) -> Self {
        self.relaxed = relaxed;
        self
    }

    /// Sets whether matched values are cast (default) or must already have the type.
    pub fn cast(mut self, cast: bool) -> Self {
        self.cast = cast;
        self
    }
}

impl Validator for TypeValidator {
    fn validate(&self, key: &ConfigKey, value: ConfigValue) -> Result<ConfigValue> {
        let Some(expected) = self.table.lookup(key.as_str()) else {
            if self.relaxed {
                return Ok(value);
            }
            return Err(ConfigError::rejected(
                key.as_str(),
                &value,
                Rejection::NoMatchingRule,
            ));
        };

        if self.cast {
            cast_value(key.as_str(), value, expected)
        } else if value.is_type(expected) {
            Ok(value)
        } else {
            Err(ConfigError::rejected(
                key.as_str(),
                &value,
                Rejection::TypeMismatch {
                    expected: expected.name().to_string(),
                },
            ))
        }
    }
}

/// Creates a casting [`TypeValidator`] for `table`.
///
/// With `relaxed`, keys that match no rule are accepted unchanged.
pub fn type_validator(table: TypeTable, relaxed: bool) -> TypeValidator {
    TypeValidator::new(table).relaxed(relaxed)
}
