// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for reloading file sources into a store.

mod common;

use common::MockConfigSource;
use std::fs;
use tempfile::NamedTempFile;
use treecfg::prelude::*;

#[test]
#[cfg(feature = "yaml")]
fn test_manual_reload() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();
    fs::write(&path, "key: initial_value\n").unwrap();

    let mut source = YamlFileAdapter::from_file(&path).unwrap();
    let mut store = ConfigStore::new();
    store.load_source(&source).unwrap();
    assert_eq!(store.get("key").unwrap(), ConfigValue::from("initial_value"));

    fs::write(&path, "key: updated_value\n").unwrap();

    // The store keeps the old value until the source is reloaded and loaded again.
    assert_eq!(store.get("key").unwrap(), ConfigValue::from("initial_value"));

    source.reload().unwrap();
    store.load_source(&source).unwrap();
    assert_eq!(store.get("key").unwrap(), ConfigValue::from("updated_value"));
}

#[test]
#[cfg(feature = "ini")]
fn test_reload_reports_parse_errors() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();
    fs::write(&path, "[s]\nkey = 1\n").unwrap();

    let mut source = IniFileAdapter::from_file(&path, Vec::<String>::new()).unwrap();
    fs::write(&path, "key outside section\n").unwrap();

    assert!(matches!(
        source.reload(),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
#[cfg(feature = "yaml")]
fn test_reload_missing_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();
    fs::write(&path, "key: value\n").unwrap();

    let mut source = YamlFileAdapter::from_file(&path).unwrap();
    drop(temp_file);

    assert!(matches!(
        source.reload(),
        Err(ConfigError::SourceError { .. })
    ));
}

#[test]
fn test_failing_reload() {
    let mut source = MockConfigSource::new("test", 1).with_failure(true);
    assert!(source.reload().is_err());
}
