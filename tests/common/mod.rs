// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities and mock implementations shared by the integration tests.

use std::io::Write;
use tempfile::NamedTempFile;
use treecfg::domain::{ConfigError, ConfigValue, Result};
use treecfg::ports::{ConfigSource, Entry};

/// A mock configuration source for testing.
///
/// This allows tests to easily create a source with predefined pairs, a custom
/// priority and, optionally, failing reads.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct MockConfigSource {
    name: String,
    priority: u8,
    entries: Vec<Entry>,
    should_fail: bool,
}

#[allow(dead_code)]
impl MockConfigSource {
    /// Creates a new mock source with the given name and priority.
    pub fn new(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
            entries: Vec::new(),
            should_fail: false,
        }
    }

    /// Adds a pair to the mock source.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Sets whether reading and reloading should fail.
    pub fn with_failure(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    fn failure(&self) -> ConfigError {
        ConfigError::SourceError {
            source_name: self.name.clone(),
            message: "Mock failure".to_string(),
            source: None,
        }
    }
}

impl ConfigSource for MockConfigSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        if self.should_fail {
            return Err(self.failure());
        }
        Ok(self.entries.clone())
    }

    fn reload(&mut self) -> Result<()> {
        if self.should_fail {
            Err(self.failure())
        } else {
            Ok(())
        }
    }
}

/// Creates a temporary file with the given suffix and content.
///
/// Returns a NamedTempFile that will be automatically deleted when dropped.
#[allow(dead_code)]
pub fn create_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// Creates sources with different priorities for precedence testing.
#[allow(dead_code)]
pub fn create_precedence_sources() -> (MockConfigSource, MockConfigSource, MockConfigSource) {
    let low = MockConfigSource::new("low_priority", 1)
        .with_value("key1", "from_low")
        .with_value("key2", "low_value");

    let medium = MockConfigSource::new("medium_priority", 2)
        .with_value("key1", "from_medium")
        .with_value("key3", "medium_value");

    let high = MockConfigSource::new("high_priority", 3)
        .with_value("key1", "from_high")
        .with_value("key4", "high_value");

    (low, medium, high)
}
