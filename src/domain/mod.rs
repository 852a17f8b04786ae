// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types of the store: dotted keys, dynamically
//! typed values, the casting rules used by typed validators, and the error taxonomy.
//! It is independent of any external concerns.

pub mod cast;
pub mod config_key;
pub mod config_value;
pub mod errors;

// Re-export commonly used types
pub use cast::cast_value;
pub use config_key::ConfigKey;
pub use config_value::{ConfigValue, ValueType};
pub use errors::{ConfigError, Rejection, Result};
