//! Session asset map: logical path → fingerprinted path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from logical asset path to fingerprinted path.
///
/// Keys are unique and the last write for a key wins. Ordered, so the
/// manifest written from it is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetMap(BTreeMap<String, String>);

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Check whether some key already maps to `value`.
    pub fn contains_value(&self, value: &str) -> bool {
        self.0.values().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries whose value differs from the key.
    pub fn renamed_count(&self) -> usize {
        self.0.iter().filter(|(k, v)| k != v).count()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AssetMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for AssetMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
