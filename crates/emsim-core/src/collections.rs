//! # Attribute Sets and Indexed Collections
//!
//! - [`AttributeSet`]: ordered, unique mesh-region tags. Sections union the
//!   attributes of their entities into a "used attributes" set that later
//!   cross-section checks consult.
//! - [`IndexedMap`]: entities keyed by a user-declared positive index
//!   (ports, probes, postprocessing entries). Inserting an index twice is
//!   a configuration error, never a silent overwrite.

use std::collections::btree_map::{self, Entry};
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::ConfigError;

/// An ordered set of integer mesh attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeSet<i32>);

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every attribute in `attributes`.
    pub fn extend_from<'a>(&mut self, attributes: impl IntoIterator<Item = &'a i32>) {
        self.0.extend(attributes.into_iter().copied());
    }

    /// Add every attribute of another set.
    pub fn union_with(&mut self, other: &AttributeSet) {
        self.0.extend(other.0.iter().copied());
    }

    /// Returns true if `attribute` is in the set.
    pub fn contains(&self, attribute: i32) -> bool {
        self.0.contains(&attribute)
    }

    /// Attributes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }

    /// Attributes of `self` that are missing from `other`, ascending.
    pub fn difference<'a>(&'a self, other: &'a AttributeSet) -> impl Iterator<Item = i32> + 'a {
        self.0.difference(&other.0).copied()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i32> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Entities keyed by a unique, user-declared positive index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexedMap<V>(BTreeMap<u32, V>);

impl<V> Default for IndexedMap<V> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<V> IndexedMap<V> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateIndex`] naming `section` if `index`
    /// is already present; the existing entry is left untouched.
    pub fn try_insert(&mut self, section: &str, index: u32, value: V) -> Result<&mut V, ConfigError> {
        match self.0.entry(index) {
            Entry::Vacant(slot) => Ok(slot.insert(value)),
            Entry::Occupied(_) => Err(ConfigError::DuplicateIndex {
                section: section.to_string(),
                index,
            }),
        }
    }

    /// Look up an entry by index.
    pub fn get(&self, index: u32) -> Option<&V> {
        self.0.get(&index)
    }

    /// Entries in ascending index order.
    pub fn iter(&self) -> btree_map::Iter<'_, u32, V> {
        self.0.iter()
    }

    /// Entity values in ascending index order.
    pub fn values(&self) -> btree_map::Values<'_, u32, V> {
        self.0.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, V> IntoIterator for &'a IndexedMap<V> {
    type Item = (&'a u32, &'a V);
    type IntoIter = btree_map::Iter<'a, u32, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
