use std::collections::BTreeMap;

use crate::hash::structural_hash;
use crate::problem::ProblemStructure;
use crate::values::LeafValueMap;

use super::matching::{pair_changed, pair_identical};
use super::types::RematchResult;

/// Aligns the leaves of `old` onto the leaves of `new`.
///
/// `old` is the structure the recorded values were keyed against; `new` is
/// the freshly authored structure.
///
/// # Algorithm
///
/// 1. Compare the structural hashes of the two normalized trees. If they are
///    equal, every leaf aligns with the leaf at the same position and
///    `structure_changed` is `false`.
/// 2. Otherwise pair groups by sequence index (see the matching rules on
///    the group pairing) and align the leaves of every accepted pair by their
///    index within the group.
/// 3. Emit the alignment in the external id space of each structure.
///
/// The matcher never fails: a group that cannot be traced confidently is
/// reported as blanked in [`RematchResult::groups`] and its leaves start
/// empty.
pub fn rematch(old: &ProblemStructure, new: &ProblemStructure) -> RematchResult {
    let structure_changed = structural_hash(old.tree()) != structural_hash(new.tree());

    let pairing = if structure_changed {
        pair_changed(old, new)
    } else {
        pair_identical(old, new)
    };

    let mut alignment = BTreeMap::new();
    for &(oi, ni, _) in &pairing.aligned {
        let og = &old.groups()[oi];
        let ng = &new.groups()[ni];
        for (old_leaf, new_leaf) in og.inputs.iter().zip(&ng.inputs) {
            alignment.insert(old.external_id(og, old_leaf), new.external_id(ng, new_leaf));
        }
    }

    RematchResult {
        alignment,
        structure_changed,
        groups: pairing.outcomes,
    }
}

/// Builds the value map for `new` from a rematch result.
///
/// Every leaf of `new` gets an entry: the value recorded under the aligned
/// old id when there is one, the empty string otherwise. Old ids missing from
/// `old_values` (for instance, values recorded under a different root id)
/// also yield blanks.
pub fn carry_forward(
    result: &RematchResult,
    old_values: &LeafValueMap,
    new: &ProblemStructure,
) -> LeafValueMap {
    let inverse = result.new_to_old();
    new.leaf_ids()
        .into_iter()
        .map(|id| {
            let value = inverse
                .get(&id)
                .and_then(|old_id| old_values.get(old_id))
                .unwrap_or_default()
                .to_owned();
            (id, value)
        })
        .collect()
}

/// Rematches and carries values forward in one step.
///
/// Returns the value map for `new` together with the rematch result that
/// produced it.
pub fn rematch_values(
    old: &ProblemStructure,
    old_values: &LeafValueMap,
    new: &ProblemStructure,
) -> (LeafValueMap, RematchResult) {
    let result = rematch(old, new);
    let values = carry_forward(&result, old_values, new);
    (values, result)
}
