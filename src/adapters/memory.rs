// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration source.
//!
//! This module provides [`MemorySource`], used for programmatic defaults and for
//! feeding hand-built pairs into a store alongside file and command-line sources.

use crate::domain::{ConfigValue, Result};
use crate::ports::{ConfigSource, Entry};

/// A configuration source backed by an ordered list of pairs.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::MemorySource;
/// use treecfg::ports::ConfigSource;
///
/// let defaults = MemorySource::defaults()
///     .with_value("server.port", 8080)
///     .with_value("server.host", "localhost");
///
/// assert_eq!(defaults.priority(), 0);
/// assert_eq!(defaults.entries().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    priority: u8,
    entries: Vec<Entry>,
}

impl MemorySource {
    /// Creates an empty source with the given name and priority.
    pub fn new(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
            entries: Vec::new(),
        }
    }

    /// Creates an empty source for programmatic defaults (priority 0).
    pub fn defaults() -> Self {
        Self::new("defaults", 0)
    }

    /// Appends a pair, consuming and returning the source.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns true if no pair has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.clone())
    }

    fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}
