/// The labeled tree every comparison in this crate operates on.
///
/// A [`LabeledTree`] is what a markup parser hands over: a tag, a flat map of
/// string attributes, and an ordered list of children. Child order is
/// significant (it determines position-based identifiers); attribute order is
/// not (attributes live in a `BTreeMap`).
///
/// Trees are treated as values. Every transformation in the crate
/// ([`crate::wrapper::remove_wrapper`], problem extraction, rematching) takes a
/// shared reference and builds a new tree, so the same old tree can be
/// compared against any number of candidate new trees.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node in a labeled tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabeledTree {
    /// The node's category, e.g. `customresponse` or `textline`.
    pub tag: String,
    /// Node-local attributes. Values are always strings; JSON scalars are
    /// coerced on deserialization.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "crate::serde_helpers::deserialize_attributes"
    )]
    pub attributes: BTreeMap<String, String>,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LabeledTree>,
}

impl LabeledTree {
    /// Creates a leaf node with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Returns this node with `key` set to `value`.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns this node with `child` appended to its children.
    #[must_use]
    pub fn with_child(mut self, child: LabeledTree) -> Self {
        self.children.push(child);
        self
    }

    /// Returns this node with every element of `children` appended in order.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = LabeledTree>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in the subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(LabeledTree::node_count).sum::<usize>()
    }

    /// Visits every node of the subtree in document (pre-)order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

/// Document-order iterator over a subtree, created by [`LabeledTree::preorder`].
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<&'a LabeledTree>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a LabeledTree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
