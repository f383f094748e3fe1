use std::collections::BTreeMap;

use serde::Serialize;

use crate::ids::ExternalId;

/// How strongly an aligned group pair agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Full hashes are equal: same tags, arrangement and attributes.
    Exact,
    /// Structural hashes are equal; only attribute values differ.
    Structural,
    /// Same position and input count; tags or nesting differ as well.
    Positional,
}

/// Why a new group received no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BlankReason {
    /// No old group exists at this sequence index.
    Added,
    /// The number of groups changed, an earlier position may have shifted,
    /// and this group is not a verbatim copy of the old group at its
    /// position, so its identity cannot be traced.
    GroupCountChanged,
    /// The group is a verbatim copy of a different old group.
    Reordered {
        /// Sequence index the group occupied in the old structure.
        from: u32,
    },
    /// The group's number of inputs changed.
    InputCountChanged {
        /// Inputs in the old group.
        old: usize,
        /// Inputs in the new group.
        new: usize,
    },
}

/// What happened to one group during rematching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// The old group's leaves were carried onto the new group position by
    /// position.
    Aligned {
        /// Sequence index of the group (same in both structures).
        sequence_index: u32,
        /// Strength of the agreement.
        kind: MatchKind,
        /// Number of leaves aligned.
        leaves: usize,
    },
    /// The new group's leaves start blank.
    Blanked {
        /// Sequence index of the group in the new structure.
        sequence_index: u32,
        /// Why no values were carried.
        #[serde(flatten)]
        reason: BlankReason,
    },
    /// An old group with no counterpart in the new structure.
    Dropped {
        /// Sequence index of the group in the old structure.
        sequence_index: u32,
        /// Number of leaves whose values are discarded.
        leaves: usize,
    },
}

impl GroupOutcome {
    /// The sequence index this outcome refers to.
    pub fn sequence_index(&self) -> u32 {
        match self {
            Self::Aligned { sequence_index, .. }
            | Self::Blanked { sequence_index, .. }
            | Self::Dropped { sequence_index, .. } => *sequence_index,
        }
    }

    /// Returns `true` for outcomes that lose recorded values.
    pub fn is_degraded(&self) -> bool {
        match self {
            Self::Aligned { .. } => false,
            Self::Blanked { .. } | Self::Dropped { .. } => true,
        }
    }
}

/// Summary statistics for a rematch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RematchSummary {
    /// Groups whose leaves were aligned.
    pub groups_aligned: usize,
    /// New groups left blank.
    pub groups_blanked: usize,
    /// Old groups with no counterpart.
    pub groups_dropped: usize,
    /// Leaves carried from the old structure to the new one.
    pub leaves_aligned: usize,
}

/// The output of [`crate::rematch::rematch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RematchResult {
    /// Old external id → new external id for every aligned leaf. Old leaves
    /// with no acceptable match are absent.
    pub alignment: BTreeMap<ExternalId, ExternalId>,
    /// `true` when the structural hashes of the two problems differ.
    pub structure_changed: bool,
    /// Per-group outcomes: new groups in sequence order, then dropped old
    /// groups.
    pub groups: Vec<GroupOutcome>,
}

impl RematchResult {
    /// Returns summary counts.
    pub fn summary(&self) -> RematchSummary {
        let mut summary = RematchSummary {
            leaves_aligned: self.alignment.len(),
            ..RematchSummary::default()
        };
        for outcome in &self.groups {
            match outcome {
                GroupOutcome::Aligned { .. } => summary.groups_aligned += 1,
                GroupOutcome::Blanked { .. } => summary.groups_blanked += 1,
                GroupOutcome::Dropped { .. } => summary.groups_dropped += 1,
            }
        }
        summary
    }

    /// Returns `true` if no group lost its values.
    pub fn is_lossless(&self) -> bool {
        !self.groups.iter().any(GroupOutcome::is_degraded)
    }

    /// The inverse alignment: new external id → old external id.
    pub fn new_to_old(&self) -> BTreeMap<&ExternalId, &ExternalId> {
        self.alignment.iter().map(|(old, new)| (new, old)).collect()
    }
}

/// A group pairing chosen by the matcher, by index into each structure's
/// group list.
pub(super) struct GroupPairing {
    /// Pairs `(old_idx, new_idx, kind)` whose leaves align by position.
    pub aligned: Vec<(usize, usize, MatchKind)>,
    /// Outcomes in reporting order (including the aligned ones).
    pub outcomes: Vec<GroupOutcome>,
}
