//! Random problem generator.
//!
//! Produces [`ProblemModel`] instances: a flat sequence of response groups,
//! each preceded by some prose and optionally wrapped in a `<text>` element,
//! the way authored capa problems look after years of editing. The model is
//! kept separate from its tree so that [`edits`] can mutate problems in
//! controlled ways.

pub mod edits;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rematch_core::{
    ContentTestRecord, Expectation, LabeledTree, LeafValueMap, MarkupError, MatchError,
    ProblemShape, ProblemStructure, to_markup,
};

/// Response tags paired with the input tag they are generated with. All of
/// them are in the default [`ProblemShape`].
const GROUP_KINDS: &[(&str, &str)] = &[
    ("customresponse", "textline"),
    ("stringresponse", "textline"),
    ("numericalresponse", "formulaequationinput"),
    ("optionresponse", "optioninput"),
    ("multiplechoiceresponse", "choicegroup"),
    ("choiceresponse", "checkboxgroup"),
];

const PROSE_TAGS: &[&str] = &["p", "div", "img", "label", "br"];

/// Configuration for the problem generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of response groups.
    pub num_groups: usize,
    /// Upper bound on inputs per group (at least 1 is always generated).
    pub max_inputs_per_group: usize,
    /// Upper bound on prose elements before each group.
    pub max_prose_per_group: usize,
    /// Fraction of groups wrapped in a `<text>` element (0.0-1.0).
    pub wrap_ratio: f64,
    /// Extra attributes per group beyond the mandatory label (0-4).
    pub attribute_density: usize,
    /// Fraction of inputs left blank in generated answers (0.0-1.0).
    pub blank_ratio: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~3 groups: a typical homework problem.
    Small,
    /// ~30 groups: a long exam page.
    Medium,
    /// ~300 groups: far past anything authored by hand.
    Large,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_groups: 3,
                max_inputs_per_group: 3,
                max_prose_per_group: 2,
                wrap_ratio: 0.3,
                attribute_density: 1,
                blank_ratio: 0.2,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_groups: 30,
                max_inputs_per_group: 4,
                max_prose_per_group: 3,
                wrap_ratio: 0.5,
                attribute_density: 2,
                blank_ratio: 0.2,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_groups: 300,
                max_inputs_per_group: 6,
                max_prose_per_group: 4,
                wrap_ratio: 0.5,
                attribute_density: 3,
                blank_ratio: 0.1,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// One input element of a generated group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    /// Input tag, e.g. `textline`.
    pub tag: String,
    /// Number of `choice` children (choice-style inputs only).
    pub choices: usize,
}

/// One generated response group and its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    /// Response tag, e.g. `customresponse`.
    pub tag: String,
    /// Group attributes. Always contains a `label` unique within the problem.
    pub attributes: Vec<(String, String)>,
    /// Inputs in document order.
    pub inputs: Vec<InputSpec>,
    /// Prose elements emitted before the group.
    pub prose: Vec<String>,
    /// Whether the group sits inside a `<text>` wrapper.
    pub wrapped: bool,
}

/// A generated problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemModel {
    /// Location id used for external ids.
    pub root_id: String,
    /// Response groups in document order.
    pub groups: Vec<GroupSpec>,
    /// Counter for fresh labels, so edited problems never reuse one.
    pub next_label: usize,
}

impl ProblemModel {
    /// Builds the problem tree.
    pub fn to_tree(&self) -> LabeledTree {
        let mut children = Vec::new();
        for group in &self.groups {
            children.extend(group.prose.iter().map(LabeledTree::new));
            let node = group.to_tree();
            if group.wrapped {
                children.push(LabeledTree::new("text").with_child(node));
            } else {
                children.push(node);
            }
        }
        LabeledTree::new("problem").with_children(children)
    }

    /// Serializes the problem tree.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] only if the in-memory writer fails.
    pub fn to_markup(&self) -> Result<String, MarkupError> {
        to_markup(&self.to_tree())
    }

    /// Extracts the problem structure under the default shape.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the structure is malformed.
    pub fn structure(&self) -> Result<ProblemStructure, MatchError> {
        ProblemStructure::from_tree(&self.root_id, &self.to_tree(), &ProblemShape::default())
    }

    /// Total number of inputs across all groups.
    pub fn input_count(&self) -> usize {
        self.groups.iter().map(|g| g.inputs.len()).sum()
    }

    pub(crate) fn fresh_label(&mut self) -> String {
        let label = format!("q{}", self.next_label);
        self.next_label += 1;
        label
    }
}

impl GroupSpec {
    fn to_tree(&self) -> LabeledTree {
        let mut node = LabeledTree::new(self.tag.as_str());
        for (key, value) in &self.attributes {
            node = node.with_attr(key.as_str(), value.as_str());
        }
        node.with_children(self.inputs.iter().map(|input| {
            LabeledTree::new(input.tag.as_str())
                .with_children((0..input.choices).map(|i| {
                    LabeledTree::new("choice").with_attr("name", format!("c{i}"))
                }))
        }))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generates a problem from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_problem(config: &GeneratorConfig) -> ProblemModel {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut model = ProblemModel {
        root_id: format!("i4x-Bench-{}-problem-P{}", config.num_groups, config.seed),
        groups: Vec::with_capacity(config.num_groups),
        next_label: 0,
    };
    for _ in 0..config.num_groups {
        let group = gen_group(config, &mut model, &mut rng);
        model.groups.push(group);
    }
    model
}

/// Generates one group with a fresh label.
pub(crate) fn gen_group(
    config: &GeneratorConfig,
    model: &mut ProblemModel,
    rng: &mut StdRng,
) -> GroupSpec {
    let (tag, input_tag) = GROUP_KINDS[rng.gen_range(0..GROUP_KINDS.len())];
    let mut attributes = vec![("label".to_owned(), model.fresh_label())];
    for i in 0..config.attribute_density {
        attributes.push((format!("a{i}"), rng.gen_range(0..1000u32).to_string()));
    }
    let inputs = (0..rng.gen_range(1..=config.max_inputs_per_group.max(1)))
        .map(|_| gen_input(input_tag, rng))
        .collect();
    let prose = (0..rng.gen_range(0..=config.max_prose_per_group))
        .map(|_| PROSE_TAGS[rng.gen_range(0..PROSE_TAGS.len())].to_owned())
        .collect();
    GroupSpec {
        tag: tag.to_owned(),
        attributes,
        inputs,
        prose,
        wrapped: rng.gen_bool(config.wrap_ratio.clamp(0.0, 1.0)),
    }
}

pub(crate) fn gen_input(tag: &str, rng: &mut StdRng) -> InputSpec {
    let choices = match tag {
        "choicegroup" | "checkboxgroup" => rng.gen_range(2..=5),
        _ => 0,
    };
    InputSpec {
        tag: tag.to_owned(),
        choices,
    }
}

/// Generates answers for every leaf of `structure`.
///
/// Roughly `blank_ratio` of the leaves are left blank; the rest get a short
/// numeric answer.
pub fn generate_values(structure: &ProblemStructure, blank_ratio: f64, seed: u64) -> LeafValueMap {
    let mut rng = StdRng::seed_from_u64(seed);
    structure
        .leaf_ids()
        .into_iter()
        .map(|id| {
            let value = if rng.gen_bool(blank_ratio.clamp(0.0, 1.0)) {
                String::new()
            } else {
                rng.gen_range(0..10_000u32).to_string()
            };
            (id, value)
        })
        .collect()
}

/// Generates a problem and a record of answers for it.
///
/// # Errors
///
/// Returns [`MatchError`] if the generated markup does not form a valid
/// structure.
pub fn generate_record(config: &GeneratorConfig) -> Result<(ProblemModel, ContentTestRecord), MatchError> {
    let model = generate_problem(config);
    let structure = model.structure()?;
    let values = generate_values(&structure, config.blank_ratio, config.seed);
    let markup = model.to_markup()?;
    let record = ContentTestRecord::new(
        &model.root_id,
        Expectation::Correct,
        &markup,
        &values,
        &ProblemShape::default(),
    )?;
    Ok((model, record))
}
