// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing validator and configuration source implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: the built-in [`TypeValidator`], and one `ConfigSource` per place
//! configuration can come from.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
#[cfg(any(feature = "yaml", feature = "ini"))]
mod file;
#[cfg(feature = "ini")]
pub mod ini_file;
pub mod memory;
pub mod type_validator;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineAdapter;
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
#[cfg(feature = "ini")]
pub use ini_file::{IniFileAdapter, IniParser};
pub use memory::MemorySource;
pub use type_validator::{type_validator, TypeTable, TypeValidator};
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
