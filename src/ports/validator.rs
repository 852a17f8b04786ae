// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validator trait definition.
//!
//! This module defines the `Validator` trait, the port through which callers gate and
//! normalize values before the store accepts them. Validators are registered per
//! namespace; the store decides which one applies to a key.

use crate::domain::{ConfigKey, ConfigValue, Result};

/// A per-namespace gate on the values written to the store.
///
/// A validator receives the fully qualified key and the candidate value, and returns
/// the value to store. It may return the value untouched, return a cast or normalized
/// value, or refuse it with [`ConfigError::ValidationRejected`].
///
/// Any `Fn(&ConfigKey, ConfigValue) -> Result<ConfigValue>` closure that is
/// `Send + Sync` is a validator.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::{ConfigError, ConfigKey, ConfigValue, Rejection, Result};
/// use treecfg::ports::Validator;
///
/// let no_nulls = |key: &ConfigKey, value: ConfigValue| -> Result<ConfigValue> {
///     if value.is_null() {
///         return Err(ConfigError::rejected(
///             key.as_str(),
///             &value,
///             Rejection::Custom("null is not allowed".into()),
///         ));
///     }
///     Ok(value)
/// };
///
/// let key = ConfigKey::parse("app.name").unwrap();
/// assert!(no_nulls.validate(&key, ConfigValue::Null).is_err());
/// assert!(no_nulls.validate(&key, ConfigValue::from("x")).is_ok());
/// ```
///
/// [`ConfigError::ValidationRejected`]: crate::domain::ConfigError::ValidationRejected
pub trait Validator: Send + Sync {
    /// Checks `value` for `key`, returning the value to store.
    fn validate(&self, key: &ConfigKey, value: ConfigValue) -> Result<ConfigValue>;
}

impl<F> Validator for F
where
    F: Fn(&ConfigKey, ConfigValue) -> Result<ConfigValue> + Send + Sync,
{
    fn validate(&self, key: &ConfigKey, value: ConfigValue) -> Result<ConfigValue> {
        self(key, value)
    }
}
