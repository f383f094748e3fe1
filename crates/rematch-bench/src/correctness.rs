//! Post-operation invariant checkers for correctness validation.

use std::collections::BTreeSet;

use rematch_core::{
    BlankReason, GroupOutcome, LabeledTree, LeafValueMap, ProblemStructure, RematchResult,
    StripWrapper as _, parse_markup, rematch, rematch_values, remove_wrappers, structural_hash,
};

use crate::generator::edits::Edit;

/// Verifies that rematching a structure against itself keeps every value.
pub fn check_identity_rematch(
    structure: &ProblemStructure,
    values: &LeafValueMap,
) -> Result<(), String> {
    let (carried, result) = rematch_values(structure, values, structure);
    if result.structure_changed {
        return Err("identical structures reported as changed".to_owned());
    }
    if !result.is_lossless() {
        return Err(format!("identity rematch lost groups: {:?}", result.groups));
    }
    for (old, new) in &result.alignment {
        if old != new {
            return Err(format!("identity rematch moved {old} to {new}"));
        }
    }
    if carried != LeafValueMap::for_structure(structure, values) {
        return Err("identity rematch changed recorded values".to_owned());
    }
    Ok(())
}

/// Verifies that the alignment is an injective map between leaf ids that
/// exist in each structure.
pub fn check_alignment(
    old: &ProblemStructure,
    new: &ProblemStructure,
    result: &RematchResult,
) -> Result<(), String> {
    let old_ids: BTreeSet<_> = old.leaf_ids().into_iter().collect();
    let new_ids: BTreeSet<_> = new.leaf_ids().into_iter().collect();
    let mut targets = BTreeSet::new();
    for (from, to) in &result.alignment {
        if !old_ids.contains(from) {
            return Err(format!("aligned id {from} is not a leaf of the old structure"));
        }
        if !new_ids.contains(to) {
            return Err(format!("aligned id {to} is not a leaf of the new structure"));
        }
        if !targets.insert(to) {
            return Err(format!("new leaf {to} aligned twice"));
        }
    }
    Ok(())
}

/// Verifies that carried values cover exactly the new leaves and hold the
/// aligned old value or a blank.
pub fn check_carried_values(
    old_values: &LeafValueMap,
    new: &ProblemStructure,
    result: &RematchResult,
    carried: &LeafValueMap,
) -> Result<(), String> {
    let keys: Vec<_> = carried.iter().map(|(id, _)| id.clone()).collect();
    let expected_keys = new.leaf_ids();
    if keys.len() != expected_keys.len() || keys.iter().any(|k| !expected_keys.contains(k)) {
        return Err(format!(
            "carried keys differ from new leaves: {} carried, {} leaves",
            keys.len(),
            expected_keys.len()
        ));
    }
    let inverse = result.new_to_old();
    for (id, value) in carried.iter() {
        let expected = inverse
            .get(id)
            .and_then(|old| old_values.get(old))
            .unwrap_or_default();
        if value != expected {
            return Err(format!("{id}: carried {value:?}, expected {expected:?}"));
        }
    }
    Ok(())
}

/// Verifies that the structural hash ignores attribute values.
pub fn check_structural_hash_ignores_attributes(tree: &LabeledTree) -> Result<(), String> {
    let before = structural_hash(tree);
    let after = structural_hash(&rename_attribute_values(tree));
    if before != after {
        return Err(format!("structural hash changed: {before} != {after}"));
    }
    Ok(())
}

fn rename_attribute_values(tree: &LabeledTree) -> LabeledTree {
    LabeledTree {
        tag: tree.tag.clone(),
        attributes: tree
            .attributes
            .keys()
            .map(|k| (k.clone(), format!("{k}-edited")))
            .collect(),
        children: tree.children.iter().map(rename_attribute_values).collect(),
    }
}

/// Verifies that stripping wrappers from markup text and from the parsed
/// tree agree.
pub fn check_wrapper_equivalence(markup: &str, wrappers: &[&str]) -> Result<(), String> {
    let tree = parse_markup(markup).map_err(|e| e.to_string())?;
    let mut stripped = markup.to_owned();
    for tag in wrappers {
        stripped = stripped.as_str().strip_wrapper(tag).map_err(|e| e.to_string())?;
    }
    let from_text = parse_markup(&stripped).map_err(|e| e.to_string())?;
    if from_text != remove_wrappers(&tree, wrappers) {
        return Err("markup stripping and tree stripping disagree".to_owned());
    }
    Ok(())
}

/// Verifies the group outcomes a rematch reports for a known edit.
///
/// `new` must be `old` with `edit` applied; `first_group_index` is the
/// shape's first sequence index.
pub fn check_edit_outcome(
    edit: Edit,
    old: &ProblemStructure,
    new: &ProblemStructure,
    first_group_index: u32,
) -> Result<(), String> {
    let result = rematch(old, new);
    let summary = result.summary();
    let n = old.groups().len();
    let expect = |aligned: usize, blanked: usize, dropped: usize| -> Result<(), String> {
        let got = (
            summary.groups_aligned,
            summary.groups_blanked,
            summary.groups_dropped,
        );
        if got == (aligned, blanked, dropped) {
            Ok(())
        } else {
            Err(format!(
                "{edit:?}: expected (aligned, blanked, dropped) = {:?}, got {got:?}",
                (aligned, blanked, dropped)
            ))
        }
    };

    match edit {
        Edit::EditAttribute { .. } | Edit::ToggleWrapper { .. } | Edit::AddProse { .. } => {
            expect(n, 0, 0)?;
            if summary.leaves_aligned != old.leaf_count() {
                return Err(format!("{edit:?}: not every leaf was carried"));
            }
        }
        Edit::AppendGroup => expect(n, 1, 0)?,
        Edit::InsertGroup { at } => expect(at, n + 1 - at, 0)?,
        Edit::RemoveLastGroup => expect(n.saturating_sub(1), 0, usize::from(n > 0))?,
        Edit::AddInput { group } => {
            expect(n - 1, 1, 0)?;
            let seq = first_group_index + u32::try_from(group).map_err(|e| e.to_string())?;
            let blanked = result.groups.iter().any(|o| {
                matches!(
                    o,
                    GroupOutcome::Blanked {
                        sequence_index,
                        reason: BlankReason::InputCountChanged { .. },
                    } if *sequence_index == seq
                )
            });
            if !blanked {
                return Err(format!("{edit:?}: group {seq} not blanked for its inputs"));
            }
        }
        Edit::SwapGroups { .. } => {
            if structural_hash(old.tree()) == structural_hash(new.tree()) {
                expect(n, 0, 0)?;
            } else {
                expect(n - 2, 2, 0)?;
                let reordered = result
                    .groups
                    .iter()
                    .filter(|o| {
                        matches!(
                            o,
                            GroupOutcome::Blanked {
                                reason: BlankReason::Reordered { .. },
                                ..
                            }
                        )
                    })
                    .count();
                if reordered != 2 {
                    return Err(format!("{edit:?}: expected 2 reordered groups, got {reordered}"));
                }
            }
        }
    }
    Ok(())
}
