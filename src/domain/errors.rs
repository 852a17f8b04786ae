// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration store.
//!
//! This module defines the errors raised by the store itself (missing keys, malformed
//! keys, rejected values, conflicting validators) and by the ingestion adapters that
//! feed it. All errors use `thiserror` for proper error handling and conversion.

use std::fmt;
use thiserror::Error;

/// The reason a validator refused a value.
///
/// A rejection never carries the value itself; that lives on
/// [`ConfigError::ValidationRejected`] next to the key.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rejection {
    /// No rule of a type table matched the key and the validator is not relaxed.
    NoMatchingRule,
    /// The value does not have the expected type and casting is disabled.
    TypeMismatch {
        /// The expected type name
        expected: String,
    },
    /// Casting the value into the expected type failed.
    Cast {
        /// The expected type name
        expected: String,
        /// Why the conversion failed
        reason: String,
    },
    /// A caller-supplied validator refused the value.
    Custom(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoMatchingRule => write!(f, "no type rule matches this key"),
            Rejection::TypeMismatch { expected } => {
                write!(f, "expected a value of type {}", expected)
            }
            Rejection::Cast { expected, reason } => {
                write!(f, "cannot cast to {}: {}", expected, reason)
            }
            Rejection::Custom(reason) => write!(f, "{}", reason),
        }
    }
}

/// The main error type for store operations.
///
/// This enum represents all possible errors that can occur when reading, writing,
/// validating, or loading configuration values. It is marked as `#[non_exhaustive]`
/// to allow for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use treecfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::NotFound {
///         key: "database.host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested key or namespace does not exist.
    #[error("Configuration key not found: {key}")]
    NotFound {
        /// The key that was not found
        key: String,
    },

    /// The key is malformed or collides with the leaf/namespace structure.
    #[error("Invalid configuration key '{key}': {reason}")]
    InvalidKey {
        /// The offending key
        key: String,
        /// Why the key was refused
        reason: String,
    },

    /// A validator refused the value, or the value could not be cast.
    #[error("Value {value} rejected for key '{key}': {cause}")]
    ValidationRejected {
        /// The key being set
        key: String,
        /// A rendering of the refused value
        value: String,
        /// Why the value was refused
        cause: Rejection,
    },

    /// A validator is already registered for this namespace.
    #[error("A validator is already registered for namespace '{namespace}'")]
    ValidatorConflict {
        /// The namespace, or `<root>` for the root validator
        namespace: String,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an `InvalidKey` error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ValidationRejected` error, rendering the value with `Display`.
    pub fn rejected(key: impl Into<String>, value: &impl fmt::Display, cause: Rejection) -> Self {
        ConfigError::ValidationRejected {
            key: key.into(),
            value: value.to_string(),
            cause,
        }
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
