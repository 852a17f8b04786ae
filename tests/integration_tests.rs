// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for basic store operations.
//!
//! These tests verify that the store behaves correctly through its public API, with
//! and without validators, and when loaded from files.

mod common;

use common::{create_temp_file, MockConfigSource};
use std::collections::BTreeMap;
use treecfg::prelude::*;

fn map(pairs: &[(&str, ConfigValue)]) -> ConfigValue {
    ConfigValue::Map(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn test_set_then_get_without_validator() {
    let mut store = ConfigStore::new();
    store.set("a.b.c", vec![1, 2]).unwrap();
    store.set("x", ConfigValue::Null).unwrap();

    assert_eq!(store.get("a.b.c").unwrap(), ConfigValue::from(vec![1, 2]));
    assert_eq!(store.get("x").unwrap(), ConfigValue::Null);
}

#[test]
fn test_children_short_and_full_path() {
    let mut store = ConfigStore::new();
    store.set("a.b", 1).unwrap();

    assert_eq!(store.children(Some("a"), false).unwrap(), vec!["b"]);
    assert_eq!(store.children(Some("a"), true).unwrap(), vec!["a.b"]);
    assert_eq!(store.children(None, false).unwrap(), vec!["a"]);
}

#[test]
fn test_get_tree() {
    let mut store = ConfigStore::new();
    store.set("a.b", 1).unwrap();
    store.set("a.c", 2).unwrap();

    assert_eq!(
        store.get_tree("a").unwrap(),
        map(&[("b", 1.into()), ("c", 2.into())])
    );
}

#[test]
fn test_get_tree_nested() {
    let mut store = ConfigStore::new();
    store.set("app.db.host", "localhost").unwrap();
    store.set("app.name", "demo").unwrap();

    assert_eq!(
        store.get_tree("app").unwrap(),
        map(&[
            ("db", map(&[("host", "localhost".into())])),
            ("name", "demo".into()),
        ])
    );
    assert_eq!(
        store.tree(),
        map(&[("app", store.get_tree("app").unwrap())])
    );
}

#[test]
fn test_delete_namespace_removes_descendants() {
    let mut store = ConfigStore::new();
    store.set("z.y.a", 1).unwrap();
    store.set("z.y.b", 2).unwrap();
    store.set("other", 3).unwrap();

    store.delete("z").unwrap();

    assert!(store.get("z.y.a").unwrap_err().is_not_found());
    assert!(store.get_tree("z").unwrap_err().is_not_found());
    assert!(store.get_tree("z.y").unwrap_err().is_not_found());
    assert_eq!(store.keys(), vec!["other"]);
    assert!(store.namespaces().is_empty());
}

#[test]
fn test_delete_leaf_prunes_empty_namespaces() {
    let mut store = ConfigStore::new();
    store.set("a.b.c", 1).unwrap();
    store.set("a.d", 2).unwrap();

    store.delete("a.b.c").unwrap();
    assert!(!store.is_namespace("a.b"));
    assert!(store.is_namespace("a"));
    assert_eq!(store.children(Some("a"), false).unwrap(), vec!["d"]);

    // The pruned path is free to become a leaf.
    store.set("a.b", "leaf").unwrap();
    assert_eq!(store.get("a.b").unwrap(), ConfigValue::from("leaf"));
}

#[test]
fn test_delete_missing_key_is_not_found() {
    let mut store = ConfigStore::new();
    assert!(store.delete("missing").unwrap_err().is_not_found());
    assert!(matches!(
        store.delete("bad..key"),
        Err(ConfigError::InvalidKey { .. })
    ));
}

#[test]
fn test_leaf_and_namespace_are_exclusive() {
    let mut store = ConfigStore::new();
    store.set("a", 1).unwrap();
    assert!(matches!(
        store.set("a.b", 2),
        Err(ConfigError::InvalidKey { .. })
    ));

    let mut store = ConfigStore::new();
    store.set("a.b", 2).unwrap();
    assert!(matches!(
        store.set("a", 1),
        Err(ConfigError::InvalidKey { .. })
    ));
    assert_eq!(store.get("a.b").unwrap(), ConfigValue::Integer(2));
}

#[test]
fn test_sibling_prefix_is_not_a_child() {
    let mut store = ConfigStore::new();
    store.set("a.x", 1).unwrap();
    store.set("ab.y", 2).unwrap();

    assert_eq!(store.children(Some("a"), true).unwrap(), vec!["a.x"]);
    store.delete("a").unwrap();
    assert_eq!(store.get("ab.y").unwrap(), ConfigValue::Integer(2));
}

#[test]
fn test_typed_validator_integer_rule() {
    let types = TypeTable::new().with("count", ValueType::Integer).unwrap();
    let mut store = ConfigStore::new();
    store
        .set_validator(type_validator(types, false), None, false)
        .unwrap();

    store.set("count", "8").unwrap();
    assert_eq!(store.get("count").unwrap(), ConfigValue::Integer(8));

    match store.set("other", "x") {
        Err(ConfigError::ValidationRejected { key, cause, .. }) => {
            assert_eq!(key, "other");
            assert_eq!(cause, Rejection::NoMatchingRule);
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert!(!store.contains("other"));
}

#[test]
fn test_typed_validator_bool_rule() {
    let types = TypeTable::new().with("flag", ValueType::Bool).unwrap();
    let mut store = ConfigStore::new();
    store
        .set_validator(type_validator(types, false), None, false)
        .unwrap();

    store.set("flag", "0").unwrap();
    assert_eq!(store.get("flag").unwrap(), ConfigValue::Bool(false));
    store.set("flag", "yes").unwrap();
    assert_eq!(store.get("flag").unwrap(), ConfigValue::Bool(true));

    assert!(matches!(
        store.set("flag", "maybe"),
        Err(ConfigError::ValidationRejected {
            cause: Rejection::Cast { .. },
            ..
        })
    ));
    assert_eq!(store.get("flag").unwrap(), ConfigValue::Bool(true));
}

#[test]
fn test_second_validator_conflicts_regardless_of_recheck() {
    for recheck in [false, true] {
        let mut store = ConfigStore::new();
        store
            .set_validator(type_validator(TypeTable::new(), true), Some("db"), false)
            .unwrap();
        assert!(matches!(
            store.set_validator(type_validator(TypeTable::new(), true), Some("db"), recheck),
            Err(ConfigError::ValidatorConflict { .. })
        ));
    }
}

#[test]
fn test_most_specific_validator_wins() {
    let mut store = ConfigStore::new();
    store
        .set_validator(
            type_validator(TypeTable::new().with("*", ValueType::String).unwrap(), false),
            None,
            false,
        )
        .unwrap();
    store
        .set_validator(
            type_validator(TypeTable::new().with("*", ValueType::Integer).unwrap(), false),
            Some("limits"),
            false,
        )
        .unwrap();

    store.set("limits.max", "10").unwrap();
    store.set("name", 10).unwrap();

    assert_eq!(store.get("limits.max").unwrap(), ConfigValue::Integer(10));
    assert_eq!(store.get("name").unwrap(), ConfigValue::from("10"));
}

#[test]
fn test_recheck_failure_leaves_store_untouched() {
    let mut store = ConfigStore::new();
    store.set("db.port", "5432").unwrap();
    store.set("db.host", "localhost").unwrap();

    let types = TypeTable::new().with("db.port", ValueType::Integer).unwrap();
    let result = store.set_validator(type_validator(types.clone(), false), Some("db"), true);

    assert!(matches!(result, Err(ConfigError::ValidationRejected { .. })));
    assert!(!store.has_validator(Some("db")));
    assert_eq!(store.get("db.port").unwrap(), ConfigValue::from("5432"));

    // Relaxed, the same table accepts and normalizes the existing values.
    store
        .set_validator(type_validator(types, true), Some("db"), true)
        .unwrap();
    assert_eq!(store.get("db.port").unwrap(), ConfigValue::Integer(5432));
    assert_eq!(store.get("db.host").unwrap(), ConfigValue::from("localhost"));
}

#[test]
fn test_custom_closure_validator() {
    let mut store = ConfigStore::new();
    store
        .set_validator(
            |key: &ConfigKey, value: ConfigValue| -> Result<ConfigValue> {
                match value.as_str() {
                    Some(s) => Ok(ConfigValue::from(s.to_uppercase())),
                    None => Err(ConfigError::rejected(
                        key.as_str(),
                        &value,
                        Rejection::Custom("expected text".to_string()),
                    )),
                }
            },
            Some("names"),
            false,
        )
        .unwrap();

    store.set("names.first", "ada").unwrap();
    assert_eq!(store.get("names.first").unwrap(), ConfigValue::from("ADA"));
    assert!(store.set("names.second", 1).is_err());
}

#[test]
fn test_get_or_default() {
    let store = ConfigStore::new();
    assert_eq!(store.get_or("missing", "fallback"), ConfigValue::from("fallback"));
    assert!(store.get("missing").unwrap_err().is_not_found());
}

#[test]
fn test_invalid_keys_rejected() {
    let mut store = ConfigStore::new();
    for key in ["", ".a", "a.", "a..b"] {
        assert!(
            matches!(store.set(key, 1), Err(ConfigError::InvalidKey { .. })),
            "accepted {:?}",
            key
        );
    }
    assert!(store.is_empty());
}

#[test]
fn test_scoped_access() {
    let mut store = ConfigStore::new();
    {
        let mut server = store.scope_mut("server");
        server.set("host", "localhost").unwrap();
        server.scope_mut("tls").set("enabled", true).unwrap();
    }

    assert_eq!(store.get("server.tls.enabled").unwrap(), ConfigValue::Bool(true));
    let server = store.scope("server");
    assert_eq!(server.get("host").unwrap(), ConfigValue::from("localhost"));
    assert_eq!(server.children(false).unwrap(), vec!["host", "tls"]);
}

#[test]
#[cfg(feature = "ini")]
fn test_load_ini_file_with_root_sections() {
    let file = create_temp_file(
        ".ini",
        "[main]\na = 1\nb = 2\n\n[subsect_a]\nc = 3\n\n[extensions.importer.foo]\ng = 6\n",
    );
    let source = IniFileAdapter::from_file(file.path(), ["main"]).unwrap();

    let mut store = ConfigStore::new();
    assert_eq!(store.load_source(&source).unwrap(), 4);

    assert_eq!(store.get("a").unwrap(), ConfigValue::from("1"));
    assert_eq!(store.get("subsect_a.c").unwrap(), ConfigValue::from("3"));
    assert_eq!(
        store.children(Some("extensions.importer"), false).unwrap(),
        vec!["foo"]
    );
    assert_eq!(store.children(None, false).unwrap(), vec!["a", "b", "extensions", "subsect_a"]);
}

#[test]
#[cfg(feature = "yaml")]
fn test_load_yaml_file_through_validator() {
    let file = create_temp_file(
        ".yaml",
        "server:\n  port: \"8080\"\n  hosts:\n    - a\n    - b\n",
    );
    let source = YamlFileAdapter::from_file(file.path()).unwrap();

    let types = TypeTable::new().with("server.port", ValueType::Integer).unwrap();
    let mut store = ConfigStore::new();
    store
        .set_validator(type_validator(types, true), None, false)
        .unwrap();
    store.load_source(&source).unwrap();

    assert_eq!(store.get("server.port").unwrap(), ConfigValue::Integer(8080));
    assert_eq!(
        store.get("server.hosts").unwrap(),
        ConfigValue::from(vec!["a", "b"])
    );
}

#[test]
fn test_failing_source_propagates() {
    let source = MockConfigSource::new("broken", 1)
        .with_value("a", 1)
        .with_failure(true);
    let mut store = ConfigStore::new();

    assert!(matches!(
        store.load_source(&source),
        Err(ConfigError::SourceError { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn test_load_stops_at_first_refused_pair() {
    let mut store = ConfigStore::new();
    let result = store.load(vec![("a", 1), ("a.b", 2), ("c", 3)]);

    assert!(matches!(result, Err(ConfigError::InvalidKey { .. })));
    assert!(store.contains("a"));
    assert!(!store.contains("c"));
}
