// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) at the seams of the store:
//! validators that gate values, sources that feed pairs in, and parsers that turn file
//! contents into pairs. These traits are implemented by adapters in the adapters layer.

pub mod parser;
pub mod source;
pub mod validator;

// Re-export commonly used types
pub use parser::ConfigParser;
pub use source::{ConfigSource, Entry};
pub use validator::Validator;
