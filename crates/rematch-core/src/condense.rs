//! Attribute condensing: flattening a subtree's attributes into one map.
//!
//! The condensed map feeds the full hash (see [`crate::hash::full_hash`]) and
//! any "did only cosmetic attributes change" check. Traversal is document
//! (pre-)order, so when two nodes carry the same key the later node in
//! document order wins. The result is deterministic because traversal order
//! is fixed.
use std::collections::BTreeMap;

use crate::tree::LabeledTree;

/// Merges the attributes of `tree` and every descendant into one flat map.
///
/// Key collisions are resolved last-write-wins in document order: a child's
/// attribute overrides its parent's, and a later sibling's overrides an
/// earlier sibling's.
pub fn condense_attributes(tree: &LabeledTree) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for node in tree.preorder() {
        for (key, value) in &node.attributes {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

/// Joins every key and value of `map` into one string, `key1value1key2value2…`,
/// in the map's iteration order (sorted, for a `BTreeMap`).
///
/// Intended for summaries and cache keys. The result is ambiguous by
/// construction (`{"ab": "c"}` and `{"a": "bc"}` both give `abc`); never use
/// it where collisions matter.
pub fn condense_dict(map: &BTreeMap<String, String>) -> String {
    let capacity = map.iter().map(|(k, v)| k.len() + v.len()).sum();
    let mut out = String::with_capacity(capacity);
    for (key, value) in map {
        out.push_str(key);
        out.push_str(value);
    }
    out
}
