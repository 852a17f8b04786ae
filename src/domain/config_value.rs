// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamically typed configuration values.
//!
//! This module provides the `ConfigValue` type held by every leaf of the store, and
//! the `ValueType` tag used by typed validators to describe what a leaf must contain.
//! Values carry no declared type at the store level; loaders usually produce strings
//! and validators cast them into something more specific.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A configuration value.
///
/// # Examples
///
/// ```
/// use treecfg::domain::config_value::{ConfigValue, ValueType};
///
/// let value = ConfigValue::from(42);
/// assert_eq!(value.as_i64(), Some(42));
/// assert_eq!(value.value_type(), ValueType::Integer);
///
/// let value = ConfigValue::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ConfigValue {
    /// An explicit absence of value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    List(Vec<ConfigValue>),
    /// A nested map, as produced by [`get_tree`](crate::service::ConfigStore::get_tree).
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Returns the type tag of this value.
    ///
    /// Strings always report [`ValueType::String`], never [`ValueType::NonEmptyString`].
    pub fn value_type(&self) -> ValueType {
        match self {
            ConfigValue::Null => ValueType::Null,
            ConfigValue::Bool(_) => ValueType::Bool,
            ConfigValue::Integer(_) => ValueType::Integer,
            ConfigValue::Float(_) => ValueType::Float,
            ConfigValue::String(_) => ValueType::String,
            ConfigValue::List(_) => ValueType::List,
            ConfigValue::Map(_) => ValueType::Map,
        }
    }

    /// Returns true if the value already satisfies `expected` without conversion.
    pub fn is_type(&self, expected: ValueType) -> bool {
        match (self, expected) {
            (ConfigValue::String(s), ValueType::NonEmptyString) => !s.is_empty(),
            _ => self.value_type() == expected,
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as `f64` if this is a `Float` or an `Integer`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(n) => Some(*n),
            ConfigValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the items if this is a `List`.
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(n) => write!(f, "{}", n),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ConfigValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(i64::from(n))
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        ConfigValue::Integer(i64::from(n))
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Float(n)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(map: BTreeMap<String, ConfigValue>) -> Self {
        ConfigValue::Map(map)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

/// The expected type of a leaf, as declared in a type table.
///
/// `NonEmptyString` is a refinement of `String` that refuses `""`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// `ConfigValue::Null`
    Null,
    /// `ConfigValue::Bool`
    Bool,
    /// `ConfigValue::Integer`
    Integer,
    /// `ConfigValue::Float`
    Float,
    /// `ConfigValue::String`
    String,
    /// `ConfigValue::String` holding at least one character
    NonEmptyString,
    /// `ConfigValue::List`
    List,
    /// `ConfigValue::Map`
    Map,
}

impl ValueType {
    /// Returns the human readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::NonEmptyString => "non-empty string",
            ValueType::List => "list",
            ValueType::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
