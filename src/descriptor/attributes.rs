//! Raw attribute maps
//!
//! An [`Attributes`] map is what callers, shortcuts and configuration hand
//! over before a [`Descriptor`](super::Descriptor) is built. A key mapped to
//! `None` is an explicit null and is kept apart from a key that is absent:
//! defaults fill absent keys only.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Option<Value>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a present value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), Some(value.into()));
        self
    }

    /// Builder-style insert of an explicit null
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.0.insert(name.into(), None);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<Value>) -> Option<Option<Value>> {
        self.0.insert(name.into(), value)
    }

    /// `None` when the key is absent, `Some(None)` for an explicit null
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Option<Value>> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<Value>> {
        self.0.iter()
    }

    /// Overlay `self` on `base`. Every key present in `self` wins, including
    /// explicit nulls; keys missing from `self` keep the base value.
    pub fn merged_over(self, mut base: Attributes) -> Attributes {
        base.0.extend(self.0);
        base
    }
}

impl IntoIterator for Attributes {
    type Item = (String, Option<Value>);
    type IntoIter = btree_map::IntoIter<String, Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Value>)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, Option<Value>)>>(iter: I) -> Self {
        Attributes(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
