// SPDX-License-Identifier: MIT OR Apache-2.0

//! The hierarchical configuration store.
//!
//! This module provides [`ConfigStore`], a flat key/value map that behaves like a tree.
//! Keys are dotted paths; every proper prefix of a stored key is a namespace. Leaves
//! and namespaces share one identifier space and never collide. Namespaces are kept
//! in an explicit index (namespace -> direct children), so listing, extracting and
//! deleting a subtree only touches that subtree.
//!
//! Values pass through the most specific validator registered on one of the key's
//! ancestor namespaces (falling back to the root validator) before they are stored.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::{ConfigSource, Validator};
use crate::service::scope::{Scope, ScopeMut};
use crate::service::StoreBuilder;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::iter;

/// Index and registry slot of the root namespace. No key can be empty, so this never
/// collides with a real namespace.
const ROOT: &str = "";

/// A namespace-aware, validated configuration store.
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let mut store = ConfigStore::new();
/// store.set("db.host", "localhost")?;
/// store.set("db.port", 5432)?;
///
/// assert_eq!(store.get("db.port")?, ConfigValue::Integer(5432));
/// assert_eq!(store.children(Some("db"), false)?, vec!["host", "port"]);
///
/// // A namespace cannot be overwritten by a leaf.
/// assert!(store.set("db", "oops").is_err());
///
/// store.delete("db")?;
/// assert!(store.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigStore {
    /// Leaf key -> value
    entries: BTreeMap<String, ConfigValue>,
    /// Namespace -> full paths of its direct children; `ROOT` holds the top-level keys
    index: HashMap<String, BTreeSet<String>>,
    /// Namespace -> validator; `ROOT` holds the root validator
    validators: HashMap<String, Box<dyn Validator>>,
}

impl ConfigStore {
    /// Creates an empty store with no entries, namespaces or validators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for assembling a store from validators and sources.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Creates a store and loads `pairs` into it, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first pair that [`set`](Self::set) refuses.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ConfigValue>,
    {
        let mut store = Self::new();
        store.load(pairs)?;
        Ok(store)
    }

    /// Sets `key` to `value`.
    ///
    /// The value is passed to the validator of the most specific ancestor namespace
    /// that has one (the root validator otherwise), and whatever that validator
    /// returns is stored. Without a validator the value is stored unchanged. Every
    /// strict ancestor of `key` becomes a namespace.
    ///
    /// Nothing is modified unless the call succeeds.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidKey`] if the key is malformed, is currently a namespace,
    ///   or has an ancestor that is currently a leaf.
    /// * [`ConfigError::ValidationRejected`] if the validator refuses the value.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let key = ConfigKey::parse(key)?;
        self.check_structure(&key)?;
        let value = self.validate(&key, value.into())?;
        self.commit(key, value);
        Ok(())
    }

    /// Returns a copy of the value stored at `key`.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidKey`] if the key is malformed.
    /// * [`ConfigError::NotFound`] if `key` is not a leaf. Namespaces are not leaves.
    pub fn get(&self, key: &str) -> Result<ConfigValue> {
        let key = ConfigKey::parse(key)?;
        self.entries
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                key: key.into_string(),
            })
    }

    /// Returns the value stored at `key`, or `default` when there is none.
    pub fn get_or(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.get(key).unwrap_or_else(|_| default.into())
    }

    /// Returns true if `key` is a leaf.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns true if `key` is a namespace, i.e. a strict prefix of some leaf.
    pub fn is_namespace(&self, key: &str) -> bool {
        key != ROOT && self.index.contains_key(key)
    }

    /// Returns the number of leaves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no leaves.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every leaf key, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Returns every namespace, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = self
            .index
            .keys()
            .filter(|ns| ns.as_str() != ROOT)
            .cloned()
            .collect();
        namespaces.sort();
        namespaces
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Deletes a leaf, or a namespace together with everything below it.
    ///
    /// Ancestor namespaces left without descendants are pruned.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidKey`] if the key is malformed.
    /// * [`ConfigError::NotFound`] if `key` is neither a leaf nor a namespace.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let key = ConfigKey::parse(key)?;

        if self.entries.remove(key.as_str()).is_some() {
            tracing::trace!("Deleted key '{}'", key);
        } else if self.is_namespace(key.as_str()) {
            let removed = self.remove_subtree(key.as_str());
            tracing::debug!("Deleted namespace '{}' ({} keys)", key, removed);
        } else {
            return Err(ConfigError::NotFound {
                key: key.into_string(),
            });
        }

        self.unlink(&key);
        Ok(())
    }

    /// Lists the direct children of `namespace` (`None` for the root).
    ///
    /// Children include both leaves and sub-namespaces, but not grandchildren. With
    /// `full_path` each child is returned as its full dotted path, otherwise as its
    /// trailing segment. The result is sorted.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidKey`] if `namespace` is malformed.
    /// * [`ConfigError::NotFound`] if `namespace` is not a namespace.
    pub fn children(&self, namespace: Option<&str>, full_path: bool) -> Result<Vec<String>> {
        let namespace = namespace.unwrap_or(ROOT);
        if namespace != ROOT {
            ConfigKey::parse(namespace)?;
        }
        if namespace != ROOT && !self.is_namespace(namespace) {
            return Err(ConfigError::NotFound {
                key: namespace.to_string(),
            });
        }

        let children = self.index.get(namespace).into_iter().flatten();
        Ok(if full_path {
            children.cloned().collect()
        } else {
            children.map(|child| last_segment(child).to_string()).collect()
        })
    }

    /// Builds a nested map of everything below `namespace`.
    ///
    /// Sub-namespaces become nested maps; leaves are copied.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidKey`] if `namespace` is malformed.
    /// * [`ConfigError::NotFound`] if `namespace` is not a namespace.
    pub fn get_tree(&self, namespace: &str) -> Result<ConfigValue> {
        ConfigKey::parse(namespace)?;
        if !self.is_namespace(namespace) {
            return Err(ConfigError::NotFound {
                key: namespace.to_string(),
            });
        }
        self.build_tree(namespace).map(ConfigValue::Map)
    }

    /// Builds a nested map of the whole store.
    pub fn tree(&self) -> ConfigValue {
        // Every indexed child is either a leaf or a namespace, so this cannot fail.
        ConfigValue::Map(self.build_tree(ROOT).unwrap_or_default())
    }

    /// Registers `validator` for `namespace` (`None` or `Some("")` for the root).
    ///
    /// With `recheck`, every existing leaf under the namespace (every leaf, for the
    /// root) is validated again through normal resolution with the new validator in
    /// place, and normalized values are written back. If any of them is refused the
    /// registration is undone and the store is left exactly as it was.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ValidatorConflict`] if the namespace already has a validator.
    /// * [`ConfigError::InvalidKey`] if the namespace is malformed or is a leaf.
    /// * [`ConfigError::ValidationRejected`] if the recheck fails.
    pub fn set_validator<V>(
        &mut self,
        validator: V,
        namespace: Option<&str>,
        recheck: bool,
    ) -> Result<()>
    where
        V: Validator + 'static,
    {
        self.register_validator(Box::new(validator), namespace, recheck)
    }

    /// Registers an already boxed validator; see [`set_validator`](Self::set_validator).
    pub fn register_validator(
        &mut self,
        validator: Box<dyn Validator>,
        namespace: Option<&str>,
        recheck: bool,
    ) -> Result<()> {
        let namespace = namespace_id(namespace)?;

        if self.validators.contains_key(&namespace) {
            return Err(ConfigError::ValidatorConflict {
                namespace: display_namespace(&namespace).to_string(),
            });
        }
        if self.entries.contains_key(&namespace) {
            return Err(ConfigError::invalid_key(
                namespace,
                "is a leaf; validators attach to namespaces",
            ));
        }

        self.validators.insert(namespace.clone(), validator);

        if recheck {
            match self.revalidate(&namespace) {
                Ok(updates) => {
                    tracing::debug!(
                        "Rechecked namespace '{}' ({} values normalized)",
                        display_namespace(&namespace),
                        updates.len()
                    );
                    self.entries.extend(updates);
                }
                Err(e) => {
                    self.validators.remove(&namespace);
                    tracing::warn!(
                        "Validator for '{}' refused existing values: {}",
                        display_namespace(&namespace),
                        e
                    );
                    return Err(e);
                }
            }
        }

        tracing::debug!("Registered validator for '{}'", display_namespace(&namespace));
        Ok(())
    }

    /// Returns true if `namespace` (`None` for the root) has a validator.
    pub fn has_validator(&self, namespace: Option<&str>) -> bool {
        self.validators.contains_key(namespace.unwrap_or(ROOT))
    }

    /// Feeds `pairs` through [`set`](Self::set), in order, returning how many were set.
    ///
    /// # Errors
    ///
    /// Stops at the first refused pair and returns its error; earlier pairs stay set.
    pub fn load<I, K, V>(&mut self, pairs: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ConfigValue>,
    {
        let mut count = 0;
        for (key, value) in pairs {
            self.set(key.as_ref(), value)?;
            count += 1;
        }
        Ok(count)
    }

    /// Loads every entry of `source`.
    pub fn load_source(&mut self, source: &dyn ConfigSource) -> Result<usize> {
        let entries = source.entries()?;
        let count = self.load(entries)?;
        tracing::debug!(
            "Loaded {} entries from source '{}' (priority {})",
            count,
            source.name(),
            source.priority()
        );
        Ok(count)
    }

    /// Returns a read-only view of the keys below `prefix`.
    pub fn scope(&self, prefix: &str) -> Scope<'_> {
        Scope::new(self, prefix)
    }

    /// Returns a read-write view of the keys below `prefix`.
    pub fn scope_mut(&mut self, prefix: &str) -> ScopeMut<'_> {
        ScopeMut::new(self, prefix)
    }

    /// Refuses keys that would make a string both a leaf and a namespace.
    fn check_structure(&self, key: &ConfigKey) -> Result<()> {
        if self.is_namespace(key.as_str()) {
            return Err(ConfigError::invalid_key(key.as_str(), "is a namespace"));
        }
        if let Some(leaf) = key.ancestors().find(|a| self.entries.contains_key(*a)) {
            return Err(ConfigError::invalid_key(
                key.as_str(),
                format!("ancestor '{}' is a leaf", leaf),
            ));
        }
        Ok(())
    }

    /// Finds the validator of the most specific ancestor namespace, then the root.
    fn resolve_validator(&self, key: &ConfigKey) -> Option<(&str, &dyn Validator)> {
        key.ancestors()
            .chain(iter::once(ROOT))
            .find_map(|ns| self.validators.get_key_value(ns))
            .map(|(ns, validator)| (ns.as_str(), validator.as_ref()))
    }

    fn validate(&self, key: &ConfigKey, value: ConfigValue) -> Result<ConfigValue> {
        match self.resolve_validator(key) {
            Some((namespace, validator)) => {
                tracing::trace!(
                    "Validating '{}' with validator of '{}'",
                    key,
                    display_namespace(namespace)
                );
                validator.validate(key, value)
            }
            None => Ok(value),
        }
    }

    /// Stores an already validated value and links the key into the index.
    fn commit(&mut self, key: ConfigKey, value: ConfigValue) {
        let mut child = key.as_str();
        loop {
            let parent = parent_of(child);
            let linked = self
                .index
                .entry(parent.to_string())
                .or_default()
                .insert(child.to_string());
            // Once a link exists, the rest of the chain up to the root exists too.
            if !linked || parent == ROOT {
                break;
            }
            child = parent;
        }
        tracing::trace!("Set '{}' = {}", key, value);
        self.entries.insert(key.into_string(), value);
    }

    /// Removes every leaf and namespace below `namespace`, and `namespace` itself from
    /// the index. Returns the number of leaves removed.
    fn remove_subtree(&mut self, namespace: &str) -> usize {
        let mut removed = 0;
        let mut pending = vec![namespace.to_string()];
        while let Some(ns) = pending.pop() {
            for child in self.index.remove(&ns).unwrap_or_default() {
                if self.entries.remove(&child).is_some() {
                    removed += 1;
                } else {
                    pending.push(child);
                }
            }
        }
        removed
    }

    /// Detaches `key` from its parent, pruning ancestors that end up empty.
    fn unlink(&mut self, key: &ConfigKey) {
        let mut child = key.as_str();
        loop {
            let parent = parent_of(child);
            let now_empty = match self.index.get_mut(parent) {
                Some(children) => {
                    children.remove(child);
                    children.is_empty()
                }
                None => false,
            };
            if !now_empty {
                break;
            }
            self.index.remove(parent);
            if parent == ROOT {
                break;
            }
            child = parent;
        }
    }

    /// Validates every leaf under `namespace` again, returning the values that changed.
    fn revalidate(&self, namespace: &str) -> Result<Vec<(String, ConfigValue)>> {
        let mut updates = Vec::new();
        for key in self.leaves_under(namespace) {
            let current = &self.entries[&key];
            let key = ConfigKey::parse(key)?;
            let validated = self.validate(&key, current.clone())?;
            if &validated != current {
                updates.push((key.into_string(), validated));
            }
        }
        Ok(updates)
    }

    /// Collects the leaves below `namespace` by walking the index.
    fn leaves_under(&self, namespace: &str) -> Vec<String> {
        if namespace == ROOT {
            return self.entries.keys().cloned().collect();
        }
        let mut leaves = Vec::new();
        let mut pending = vec![namespace];
        while let Some(ns) = pending.pop() {
            for child in self.index.get(ns).into_iter().flatten() {
                if self.entries.contains_key(child) {
                    leaves.push(child.clone());
                } else {
                    pending.push(child);
                }
            }
        }
        leaves
    }

    fn build_tree(&self, namespace: &str) -> Result<BTreeMap<String, ConfigValue>> {
        let mut tree = BTreeMap::new();
        for child in self.index.get(namespace).into_iter().flatten() {
            let value = if self.is_namespace(child) {
                ConfigValue::Map(self.build_tree(child)?)
            } else {
                self.get(child)?
            };
            tree.insert(last_segment(child).to_string(), value);
        }
        Ok(tree)
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut validators: Vec<&str> = self
            .validators
            .keys()
            .map(|ns| display_namespace(ns))
            .collect();
        validators.sort();
        f.debug_struct("ConfigStore")
            .field("entries", &self.entries)
            .field("namespaces", &self.namespaces())
            .field("validators", &validators)
            .finish()
    }
}

/// Normalizes a caller-supplied namespace into its registry slot.
fn namespace_id(namespace: Option<&str>) -> Result<String> {
    match namespace {
        None | Some(ROOT) => Ok(ROOT.to_string()),
        Some(ns) => ConfigKey::parse(ns).map(ConfigKey::into_string),
    }
}

fn display_namespace(namespace: &str) -> &str {
    if namespace == ROOT {
        "<root>"
    } else {
        namespace
    }
}

/// Parent namespace of an index path; `ROOT` for top-level keys.
fn parent_of(path: &str) -> &str {
    path.rfind('.').map_or(ROOT, |idx| &path[..idx])
}

fn last_segment(path: &str) -> &str {
    path.rfind('.').map_or(path, |idx| &path[idx + 1..])
}
