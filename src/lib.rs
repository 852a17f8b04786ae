// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical, namespace-aware, type-validated configuration store.
//!
//! Keys are dotted paths (`server.http.port`). Every strict prefix of a stored key is
//! a namespace, and a string is never both a leaf and a namespace. Validators attach
//! to namespaces (or the root); the most specific one checks, and may normalize, every
//! value set below it. Configuration can be loaded from INI and YAML files,
//! environment variables, command-line arguments and programmatic defaults.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and rules (`ConfigKey`, `ConfigValue`, `ValueType`,
//!   casting, errors)
//! - **Ports**: Trait definitions that define interfaces (`Validator`, `ConfigSource`,
//!   `ConfigParser`)
//! - **Adapters**: The typed validator and one source per configuration origin
//! - **Service**: The store itself, its builder and scoped views
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `ini`: Enable INI file support (default)
//! - `env`: Enable environment variable support (default)
//! - `cli`: Enable command-line argument and `clap` support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use treecfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let types = TypeTable::new()
//!     .with("server.port", ValueType::Integer)?
//!     .with("server.debug", ValueType::Bool)?;
//!
//! let mut store = ConfigStore::new();
//! store.set_validator(type_validator(types, true), Some("server"), false)?;
//!
//! store.set("server.port", "8080")?;
//! store.set("server.debug", "yes")?;
//! store.set("server.name", "api")?;
//!
//! assert_eq!(store.get("server.port")?, ConfigValue::Integer(8080));
//! assert_eq!(store.get("server.debug")?, ConfigValue::Bool(true));
//! assert_eq!(store.children(Some("server"), false)?, vec!["debug", "name", "port"]);
//!
//! let server = store.scope("server");
//! assert_eq!(server.get("name")?, ConfigValue::from("api"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        cast_value, ConfigError, ConfigKey, ConfigValue, Rejection, Result, ValueType,
    };
    pub use crate::ports::{ConfigParser, ConfigSource, Entry, Validator};
    pub use crate::service::{ConfigStore, Scope, ScopeMut, StoreBuilder};

    pub use crate::adapters::{type_validator, MemorySource, TypeTable, TypeValidator};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "ini")]
    pub use crate::adapters::{IniFileAdapter, IniParser};
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
