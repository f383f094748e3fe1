//! Authoring edits applied to generated problems.
//!
//! Each [`Edit`] mimics something a course author does to a live problem.
//! Edits are applied to a copy of the model so benchmarks and invariant
//! tests can compare the before and after structures.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{GeneratorConfig, ProblemModel, gen_group, gen_input};

/// A single authoring edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Change an attribute value of one group.
    EditAttribute { group: usize },
    /// Move one group in or out of a `<text>` wrapper.
    ToggleWrapper { group: usize },
    /// Add prose before one group.
    AddProse { group: usize },
    /// Append a new group at the end.
    AppendGroup,
    /// Insert a new group before position `at`.
    InsertGroup { at: usize },
    /// Remove the last group.
    RemoveLastGroup,
    /// Add an input to one group.
    AddInput { group: usize },
    /// Exchange two groups.
    SwapGroups { a: usize, b: usize },
}

impl Edit {
    /// Picks a random edit applicable to `model`.
    pub fn random(model: &ProblemModel, rng: &mut StdRng) -> Self {
        let n = model.groups.len();
        if n == 0 {
            return Edit::AppendGroup;
        }
        match rng.gen_range(0..8) {
            0 => Edit::EditAttribute {
                group: rng.gen_range(0..n),
            },
            1 => Edit::ToggleWrapper {
                group: rng.gen_range(0..n),
            },
            2 => Edit::AddProse {
                group: rng.gen_range(0..n),
            },
            3 => Edit::AppendGroup,
            4 => Edit::InsertGroup {
                at: rng.gen_range(0..n),
            },
            5 => Edit::RemoveLastGroup,
            6 => Edit::AddInput {
                group: rng.gen_range(0..n),
            },
            _ if n >= 2 => {
                let a = rng.gen_range(0..n);
                let b = (a + rng.gen_range(1..n)) % n;
                Edit::SwapGroups { a, b }
            }
            _ => Edit::AppendGroup,
        }
    }

    /// Returns `true` for edits that leave every recorded answer in place.
    pub fn preserves_all_values(self) -> bool {
        match self {
            Edit::EditAttribute { .. } | Edit::ToggleWrapper { .. } | Edit::AddProse { .. } => {
                true
            }
            Edit::AppendGroup
            | Edit::InsertGroup { .. }
            | Edit::RemoveLastGroup
            | Edit::AddInput { .. }
            | Edit::SwapGroups { .. } => false,
        }
    }
}

/// Applies `edit` to a copy of `model`.
///
/// New groups and inputs are generated from `config`, seeded by `seed`.
/// Out-of-range group indices leave the model unchanged.
pub fn apply_edit(
    model: &ProblemModel,
    edit: Edit,
    config: &GeneratorConfig,
    seed: u64,
) -> ProblemModel {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = model.clone();
    match edit {
        Edit::EditAttribute { group } => {
            if let Some(g) = out.groups.get_mut(group) {
                g.attributes.push(("edited".to_owned(), rng.gen_range(0..1000u32).to_string()));
            }
        }
        Edit::ToggleWrapper { group } => {
            if let Some(g) = out.groups.get_mut(group) {
                g.wrapped = !g.wrapped;
            }
        }
        Edit::AddProse { group } => {
            if let Some(g) = out.groups.get_mut(group) {
                g.prose.push("p".to_owned());
            }
        }
        Edit::AppendGroup => {
            let g = gen_group(config, &mut out, &mut rng);
            out.groups.push(g);
        }
        Edit::InsertGroup { at } => {
            if at <= out.groups.len() {
                let g = gen_group(config, &mut out, &mut rng);
                out.groups.insert(at, g);
            }
        }
        Edit::RemoveLastGroup => {
            out.groups.pop();
        }
        Edit::AddInput { group } => {
            if let Some(g) = out.groups.get_mut(group) {
                let tag = g
                    .inputs
                    .first()
                    .map_or_else(|| "textline".to_owned(), |i| i.tag.clone());
                g.inputs.push(gen_input(&tag, &mut rng));
            }
        }
        Edit::SwapGroups { a, b } => {
            if a < out.groups.len() && b < out.groups.len() {
                out.groups.swap(a, b);
            }
        }
    }
    out
}
