/// Problem structure extraction: response groups and their input leaves.
///
/// A [`ProblemStructure`] is the matcher's view of a problem: the normalized
/// tree (wrappers stripped) plus the ordered list of [`ResponseGroup`]s, each
/// owning its ordered [`InputLeaf`]s. Which tags count as groups, inputs and
/// wrappers is configured by a [`ProblemShape`].
///
/// Groups are numbered in document order starting at
/// [`ProblemShape::first_group_index`]; inputs are numbered from 1 within
/// their group. A leaf's external id is derived from those two numbers and the
/// structure's root id, never stored.
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ExternalId, encode};
use crate::markup::{MarkupError, parse_markup};
use crate::tree::LabeledTree;
use crate::wrapper::remove_wrappers;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while building a [`ProblemStructure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Two leaves resolve to the same external id. This indicates a bug in
    /// whatever produced the groups, not a legitimate content edit.
    DuplicateLeafId {
        /// The colliding id.
        id: ExternalId,
    },
    /// The problem markup could not be parsed.
    Markup(MarkupError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLeafId { id } => {
                write!(f, "malformed tree: more than one input resolves to {id}")
            }
            Self::Markup(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup(e) => Some(e),
            Self::DuplicateLeafId { .. } => None,
        }
    }
}

impl From<MarkupError> for MatchError {
    fn from(e: MarkupError) -> Self {
        Self::Markup(e)
    }
}

// ---------------------------------------------------------------------------
// ProblemShape
// ---------------------------------------------------------------------------

/// Tag vocabulary used to find groups and inputs in a problem tree.
///
/// # Default
///
/// ```
/// # use rematch_core::ProblemShape;
/// let shape = ProblemShape::default();
/// assert!(shape.response_tags.contains("customresponse"));
/// assert!(shape.input_tags.contains("textline"));
/// assert_eq!(shape.wrapper_tags, ["text"]);
/// assert_eq!(shape.first_group_index, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemShape {
    /// Tags that open a response group.
    pub response_tags: BTreeSet<String>,
    /// Tags that are answerable inputs inside a response group.
    pub input_tags: BTreeSet<String>,
    /// Tags stripped (children kept) before any comparison, in order.
    pub wrapper_tags: Vec<String>,
    /// Sequence index given to the first response group.
    ///
    /// Default: `2`, the host convention under which the first input of the
    /// first response is `{root}_2_1`.
    pub first_group_index: u32,
}

const DEFAULT_RESPONSE_TAGS: &[&str] = &[
    "choiceresponse",
    "coderesponse",
    "customresponse",
    "formularesponse",
    "imageresponse",
    "javascriptresponse",
    "multiplechoiceresponse",
    "numericalresponse",
    "optionresponse",
    "schematicresponse",
    "stringresponse",
    "symbolicresponse",
    "truefalseresponse",
];

const DEFAULT_INPUT_TAGS: &[&str] = &[
    "checkboxgroup",
    "choicegroup",
    "choicetextgroup",
    "crystallography",
    "drag_and_drop_input",
    "formulaequationinput",
    "imageinput",
    "jsinput",
    "matlabinput",
    "optioninput",
    "radiogroup",
    "schematic",
    "textbox",
    "textline",
];

impl Default for ProblemShape {
    fn default() -> Self {
        Self {
            response_tags: DEFAULT_RESPONSE_TAGS.iter().map(|&t| t.to_owned()).collect(),
            input_tags: DEFAULT_INPUT_TAGS.iter().map(|&t| t.to_owned()).collect(),
            wrapper_tags: vec!["text".to_owned()],
            first_group_index: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Groups and leaves
// ---------------------------------------------------------------------------

/// A terminal, user-answerable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLeaf {
    /// 1-based position within the parent group.
    pub index_within_group: u32,
    /// The input's subtree.
    pub node: LabeledTree,
}

/// One response unit and its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseGroup {
    /// Position of this group among its siblings, offset by
    /// [`ProblemShape::first_group_index`].
    pub sequence_index: u32,
    /// The group's subtree.
    pub node: LabeledTree,
    /// Inputs in document order.
    pub inputs: Vec<InputLeaf>,
}

impl ResponseGroup {
    /// Builds a group from a subtree, numbering every input found beneath it.
    fn from_node(sequence_index: u32, node: &LabeledTree, shape: &ProblemShape) -> Self {
        let inputs = node
            .preorder()
            .skip(1)
            .filter(|n| shape.input_tags.contains(&n.tag))
            .zip(1u32..)
            .map(|(n, index_within_group)| InputLeaf {
                index_within_group,
                node: n.clone(),
            })
            .collect();
        Self {
            sequence_index,
            node: node.clone(),
            inputs,
        }
    }
}

/// Collects every response-tagged subtree in document order, without
/// descending into a response once found.
fn collect_groups<'a>(node: &'a LabeledTree, shape: &ProblemShape, out: &mut Vec<&'a LabeledTree>) {
    for child in &node.children {
        if shape.response_tags.contains(&child.tag) {
            out.push(child);
        } else {
            collect_groups(child, shape, out);
        }
    }
}

// ---------------------------------------------------------------------------
// ProblemStructure
// ---------------------------------------------------------------------------

/// A problem as seen by the matcher: root id, normalized tree, and groups.
///
/// Construction validates that every leaf has a distinct external id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemStructure {
    root_id: String,
    tree: LabeledTree,
    groups: Vec<ResponseGroup>,
}

impl ProblemStructure {
    /// Extracts the structure of `tree` using `shape`.
    ///
    /// Wrapper tags are stripped first; response groups are then collected in
    /// document order (the root itself is never a group) and numbered from
    /// `shape.first_group_index`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DuplicateLeafId`] if numbering overflows into an
    /// id collision, which cannot happen for trees of realistic size.
    pub fn from_tree(
        root_id: &str,
        tree: &LabeledTree,
        shape: &ProblemShape,
    ) -> Result<Self, MatchError> {
        let normalized = remove_wrappers(tree, &shape.wrapper_tags);
        let mut nodes = Vec::new();
        collect_groups(&normalized, shape, &mut nodes);
        let groups = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                let offset = u32::try_from(i).unwrap_or(u32::MAX);
                let sequence_index = shape.first_group_index.saturating_add(offset);
                ResponseGroup::from_node(sequence_index, node, shape)
            })
            .collect();
        Self::from_parts(root_id, normalized, groups)
    }

    /// Parses `markup` and extracts its structure; see [`Self::from_tree`].
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Markup`] for unparseable markup and
    /// [`MatchError::DuplicateLeafId`] as for [`Self::from_tree`].
    pub fn from_markup(root_id: &str, markup: &str, shape: &ProblemShape) -> Result<Self, MatchError> {
        let tree = parse_markup(markup)?;
        Self::from_tree(root_id, &tree, shape)
    }

    /// Assembles a structure from groups produced by an external parser.
    ///
    /// `tree` should be the normalized tree the groups were taken from; it is
    /// what the whole-problem hashes are computed over.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DuplicateLeafId`] when two leaves share a
    /// `(sequence_index, index_within_group)` position.
    pub fn from_parts(
        root_id: &str,
        tree: LabeledTree,
        groups: Vec<ResponseGroup>,
    ) -> Result<Self, MatchError> {
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        for group in &groups {
            for leaf in &group.inputs {
                if !seen.insert((group.sequence_index, leaf.index_within_group)) {
                    return Err(MatchError::DuplicateLeafId {
                        id: encode(root_id, group.sequence_index, leaf.index_within_group),
                    });
                }
            }
        }
        Ok(Self {
            root_id: root_id.to_owned(),
            tree,
            groups,
        })
    }

    /// The root id all leaf ids are derived from.
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The normalized (wrapper-stripped) tree.
    pub fn tree(&self) -> &LabeledTree {
        &self.tree
    }

    /// Response groups in sequence order.
    pub fn groups(&self) -> &[ResponseGroup] {
        &self.groups
    }

    /// Looks up a group by its sequence index.
    pub fn group(&self, sequence_index: u32) -> Option<&ResponseGroup> {
        self.groups.iter().find(|g| g.sequence_index == sequence_index)
    }

    /// The external id of `leaf` in `group` under this structure's root.
    pub fn external_id(&self, group: &ResponseGroup, leaf: &InputLeaf) -> ExternalId {
        encode(&self.root_id, group.sequence_index, leaf.index_within_group)
    }

    /// Every leaf's external id, in group then input order.
    pub fn leaf_ids(&self) -> Vec<ExternalId> {
        self.groups
            .iter()
            .flat_map(|g| g.inputs.iter().map(move |leaf| self.external_id(g, leaf)))
            .collect()
    }

    /// Total number of input leaves.
    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(|g| g.inputs.len()).sum()
    }
}
