// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path-prefixed views over a store.
//!
//! `store.scope("db").get("host")` reads `db.host`; scopes nest, so
//! `store.scope("a").scope("b").get("c")` reads `a.b.c`. A scope is only sugar: every
//! call is forwarded to the store with the prefix prepended, and the store's own rules
//! apply unchanged.

use crate::domain::{ConfigValue, Result};
use crate::service::store::ConfigStore;

fn join(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, name),
    }
}

/// A read-only view of the keys below a prefix.
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let store = ConfigStore::from_pairs([("app.db.host", "localhost")])?;
/// let db = store.scope("app").scope("db");
/// assert_eq!(db.get("host")?, ConfigValue::from("localhost"));
/// assert_eq!(db.path(), "app.db");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    store: &'a ConfigStore,
    prefix: String,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(store: &'a ConfigStore, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
        }
    }

    /// Returns the dotted path of this scope (empty for the root).
    pub fn path(&self) -> &str {
        &self.prefix
    }

    /// Returns a narrower view.
    pub fn scope(&self, name: &str) -> Scope<'a> {
        Scope {
            store: self.store,
            prefix: join(&self.prefix, name),
        }
    }

    /// Reads `name` relative to this scope.
    pub fn get(&self, name: &str) -> Result<ConfigValue> {
        self.store.get(&join(&self.prefix, name))
    }

    /// Reads `name` relative to this scope, falling back to `default`.
    pub fn get_or(&self, name: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.store.get_or(&join(&self.prefix, name), default)
    }

    /// Lists the children of this scope.
    pub fn children(&self, full_path: bool) -> Result<Vec<String>> {
        let namespace = (!self.prefix.is_empty()).then_some(self.prefix.as_str());
        self.store.children(namespace, full_path)
    }

    /// Extracts everything below this scope as a nested map.
    pub fn tree(&self) -> Result<ConfigValue> {
        if self.prefix.is_empty() {
            Ok(self.store.tree())
        } else {
            self.store.get_tree(&self.prefix)
        }
    }
}

/// A read-write view of the keys below a prefix.
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let mut store = ConfigStore::new();
/// {
///     let mut db = store.scope_mut("db");
///     db.set("host", "localhost")?;
///     db.scope_mut("pool").set("size", 8)?;
/// }
/// assert_eq!(store.get("db.pool.size")?, ConfigValue::Integer(8));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScopeMut<'a> {
    store: &'a mut ConfigStore,
    prefix: String,
}

impl<'a> ScopeMut<'a> {
    pub(crate) fn new(store: &'a mut ConfigStore, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
        }
    }

    /// Returns the dotted path of this scope (empty for the root).
    pub fn path(&self) -> &str {
        &self.prefix
    }

    /// Returns a narrower writable view, borrowing this one.
    pub fn scope_mut(&mut self, name: &str) -> ScopeMut<'_> {
        let prefix = join(&self.prefix, name);
        ScopeMut {
            store: &mut *self.store,
            prefix,
        }
    }

    /// Returns a read-only view of the same prefix.
    pub fn as_scope(&self) -> Scope<'_> {
        Scope::new(&*self.store, &self.prefix)
    }

    /// Reads `name` relative to this scope.
    pub fn get(&self, name: &str) -> Result<ConfigValue> {
        self.store.get(&join(&self.prefix, name))
    }

    /// Writes `name` relative to this scope.
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<()> {
        self.store.set(&join(&self.prefix, name), value)
    }

    /// Deletes `name` relative to this scope.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.store.delete(&join(&self.prefix, name))
    }
}
