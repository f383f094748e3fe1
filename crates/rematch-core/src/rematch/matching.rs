use crate::hash::{TreeDigest, full_hash, structural_hash};
use crate::problem::ProblemStructure;

use super::types::{BlankReason, GroupOutcome, GroupPairing, MatchKind};

/// Pairs groups of two structurally identical problems position by position.
///
/// Equal structural hashes over the whole tree imply the same number of
/// groups with the same input counts, so every pair aligns.
pub(super) fn pair_identical(old: &ProblemStructure, new: &ProblemStructure) -> GroupPairing {
    let mut aligned = Vec::with_capacity(new.groups().len());
    let mut outcomes = Vec::with_capacity(new.groups().len());

    for (i, (og, ng)) in old.groups().iter().zip(new.groups()).enumerate() {
        let kind = if full_hash(&og.node) == full_hash(&ng.node) {
            MatchKind::Exact
        } else {
            MatchKind::Structural
        };
        aligned.push((i, i, kind));
        outcomes.push(GroupOutcome::Aligned {
            sequence_index: ng.sequence_index,
            kind,
            leaves: og.inputs.len().min(ng.inputs.len()),
        });
    }

    GroupPairing { aligned, outcomes }
}

/// Pairs groups of two structurally different problems by sequence index.
///
/// Position is the dominant signal. A new group inherits from the old group
/// at the same sequence index when:
///
/// - the two groups are verbatim equal (full hash), or
/// - the number of groups is unchanged, the new group is not a verbatim copy
///   of some *other* old group, and both groups have the same number of
///   inputs. Tag and attribute edits inside the group are tolerated, or
/// - the number of groups changed, but the group sits before the first
///   shifted position and its structural hash is unchanged. Attribute edits
///   are tolerated there too.
///
/// From the first shifted position on, a group that is not verbatim equal to
/// its positional counterpart cannot be traced with confidence; it is
/// blanked rather than realigned. Old groups with no counterpart are
/// reported as dropped.
pub(super) fn pair_changed(old: &ProblemStructure, new: &ProblemStructure) -> GroupPairing {
    let same_group_count = old.groups().len() == new.groups().len();
    let old_full: Vec<TreeDigest> = old.groups().iter().map(|g| full_hash(&g.node)).collect();
    let new_full: Vec<TreeDigest> = new.groups().iter().map(|g| full_hash(&g.node)).collect();
    let shift_at = if same_group_count {
        0
    } else {
        first_shift(old, new, &old_full, &new_full)
    };

    let mut aligned = Vec::new();
    let mut outcomes = Vec::with_capacity(new.groups().len());

    for (ni, ng) in new.groups().iter().enumerate() {
        let sequence_index = ng.sequence_index;
        let Some(oi) = old
            .groups()
            .iter()
            .position(|g| g.sequence_index == sequence_index)
        else {
            outcomes.push(GroupOutcome::Blanked {
                sequence_index,
                reason: BlankReason::Added,
            });
            continue;
        };
        let og = &old.groups()[oi];
        let digest = &new_full[ni];

        if old_full[oi] == *digest {
            aligned.push((oi, ni, MatchKind::Exact));
            outcomes.push(GroupOutcome::Aligned {
                sequence_index,
                kind: MatchKind::Exact,
                leaves: ng.inputs.len(),
            });
            continue;
        }

        let blank = if !same_group_count {
            (ni >= shift_at).then_some(BlankReason::GroupCountChanged)
        } else if let Some(moved) = old_full
            .iter()
            .enumerate()
            .find(|&(j, d)| j != oi && d == digest)
        {
            Some(BlankReason::Reordered {
                from: old.groups()[moved.0].sequence_index,
            })
        } else if og.inputs.len() != ng.inputs.len() {
            Some(BlankReason::InputCountChanged {
                old: og.inputs.len(),
                new: ng.inputs.len(),
            })
        } else {
            None
        };

        if let Some(reason) = blank {
            outcomes.push(GroupOutcome::Blanked {
                sequence_index,
                reason,
            });
            continue;
        }

        let kind = if structural_hash(&og.node) == structural_hash(&ng.node) {
            MatchKind::Structural
        } else {
            MatchKind::Positional
        };
        aligned.push((oi, ni, kind));
        outcomes.push(GroupOutcome::Aligned {
            sequence_index,
            kind,
            leaves: ng.inputs.len(),
        });
    }

    for og in old.groups() {
        if new.group(og.sequence_index).is_none() {
            outcomes.push(GroupOutcome::Dropped {
                sequence_index: og.sequence_index,
                leaves: og.inputs.len(),
            });
        }
    }

    GroupPairing { aligned, outcomes }
}

/// Returns the first group position a change in group count may have
/// shifted, or the number of paired positions if none was.
///
/// A position is shifted once the paired groups there differ structurally,
/// or once a verbatim copy of an old group shows up at another position.
fn first_shift(
    old: &ProblemStructure,
    new: &ProblemStructure,
    old_full: &[TreeDigest],
    new_full: &[TreeDigest],
) -> usize {
    let paired = old_full.len().min(new_full.len());
    let structural = old
        .groups()
        .iter()
        .zip(new.groups())
        .position(|(og, ng)| structural_hash(&og.node) != structural_hash(&ng.node))
        .unwrap_or(paired);
    let moved = new_full
        .iter()
        .enumerate()
        .flat_map(|(ni, digest)| {
            old_full
                .iter()
                .enumerate()
                .filter(move |&(oi, d)| oi != ni && d == digest)
                .map(move |(oi, _)| oi.min(ni))
        })
        .min()
        .unwrap_or(paired);
    structural.min(moved)
}
