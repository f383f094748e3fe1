//! Recorded leaf values keyed by external id.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::ExternalId;
use crate::problem::ProblemStructure;

/// A mapping from leaf external id to its submitted value.
///
/// An empty string means "no value recorded". A map built for a structure
/// with [`LeafValueMap::for_structure`] or [`LeafValueMap::blank_for`] has an
/// entry for every leaf of that structure and nothing else.
///
/// Serializes as a plain JSON object, e.g. `{"p_2_1": "5", "p_2_2": ""}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafValueMap(BTreeMap<ExternalId, String>);

impl LeafValueMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with a blank entry for every leaf of `structure`.
    pub fn blank_for(structure: &ProblemStructure) -> Self {
        Self(
            structure
                .leaf_ids()
                .into_iter()
                .map(|id| (id, String::new()))
                .collect(),
        )
    }

    /// A map with an entry for every leaf of `structure`, taking values from
    /// `source` where present and blank otherwise. Entries of `source` that
    /// name no leaf of `structure` are dropped.
    pub fn for_structure(structure: &ProblemStructure, source: &LeafValueMap) -> Self {
        Self(
            structure
                .leaf_ids()
                .into_iter()
                .map(|id| {
                    let value = source.get(&id).unwrap_or_default().to_owned();
                    (id, value)
                })
                .collect(),
        )
    }

    /// Sets the value for `id`, returning the previous value.
    pub fn insert(&mut self, id: ExternalId, value: impl Into<String>) -> Option<String> {
        self.0.insert(id, value.into())
    }

    /// Returns the value for `id`, if an entry exists.
    pub fn get(&self, id: &ExternalId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Returns `true` if an entry exists for `id`.
    pub fn contains(&self, id: &ExternalId) -> bool {
        self.0.contains_key(id)
    }

    /// Iterates entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ExternalId, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Iterates entries whose value is non-blank.
    pub fn answered(&self) -> impl Iterator<Item = (&ExternalId, &str)> {
        self.iter().filter(|(_, v)| !v.is_empty())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in id order, for compact comparisons.
    pub fn values(&self) -> Vec<&str> {
        self.0.values().map(String::as_str).collect()
    }
}

impl FromIterator<(ExternalId, String)> for LeafValueMap {
    fn from_iter<I: IntoIterator<Item = (ExternalId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LeafValueMap {
    type Item = (&'a ExternalId, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, ExternalId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
