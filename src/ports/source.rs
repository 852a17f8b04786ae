// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which configuration
//! enters the store. Any configuration source (files, environment variables,
//! command-line arguments, programmatic defaults) only has to produce an ordered
//! sequence of `(key, value)` pairs.

use crate::domain::{ConfigValue, Result};

/// A single `(key, value)` pair produced by a source.
///
/// Keys are plain strings here; the store validates them when the pair is set.
pub type Entry = (String, ConfigValue);

/// A trait for configuration sources.
///
/// This trait defines the interface that all configuration sources must implement.
/// The store never looks inside a source; it asks for the entries and feeds each one
/// through [`ConfigStore::set`](crate::service::ConfigStore::set).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Priority
///
/// Each source has a priority value (0-255). When a store is assembled from several
/// sources, lower priorities are loaded first so that higher priorities overwrite
/// them. The typical priority values are:
///
/// - **3 (highest)**: Command-line arguments
/// - **2**: Environment variables
/// - **1**: Configuration files
/// - **0 (lowest)**: Programmatic defaults
///
/// # Examples
///
/// ```rust
/// use treecfg::ports::{ConfigSource, Entry};
/// use treecfg::domain::{ConfigValue, Result};
///
/// struct MySource;
///
/// impl ConfigSource for MySource {
///     fn name(&self) -> &str {
///         "my-source"
///     }
///
///     fn priority(&self) -> u8 {
///         1
///     }
///
///     fn entries(&self) -> Result<Vec<Entry>> {
///         Ok(vec![("app.name".to_string(), ConfigValue::from("demo"))])
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// assert_eq!(MySource.entries().unwrap().len(), 1);
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// This name is used for logging, error messages, and debugging. It should be
    /// a short, descriptive identifier like "env", "ini-file", "cli", etc.
    fn name(&self) -> &str;

    /// Returns the priority of this configuration source.
    ///
    /// Higher values win when several sources provide the same key.
    fn priority(&self) -> u8;

    /// Returns every `(key, value)` pair of this source, in source order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Entry>)` - The pairs to feed into the store
    /// * `Err(ConfigError)` - An error occurred while producing them
    fn entries(&self) -> Result<Vec<Entry>>;

    /// Reloads the configuration from the source.
    ///
    /// For sources that don't support reloading (like command-line arguments), this
    /// can be a no-op that returns `Ok(())`.
    fn reload(&mut self) -> Result<()>;
}
