//! Post-operation invariant tests using generated data.
#![allow(clippy::expect_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rematch_bench::correctness;
use rematch_bench::{Edit, SizeTier, apply_edit, generate_problem, generate_values};
use rematch_core::{rematch, rematch_values};

const FIRST: u32 = 2;

fn medium() -> rematch_bench::ProblemModel {
    generate_problem(&SizeTier::Medium.config(42))
}

#[test]
fn identity_rematch_invariants() {
    let structure = medium().structure().expect("structure");
    let values = generate_values(&structure, 0.2, 42);
    correctness::check_identity_rematch(&structure, &values).expect("identity invariants hold");
}

#[test]
fn structural_hash_ignores_attributes() {
    correctness::check_structural_hash_ignores_attributes(&medium().to_tree())
        .expect("structural hash invariant holds");
}

#[test]
fn wrapper_stripping_agrees() {
    let markup = medium().to_markup().expect("markup");
    correctness::check_wrapper_equivalence(&markup, &["text"]).expect("text wrapper");
    correctness::check_wrapper_equivalence(&markup, &["text", "div"]).expect("two wrappers");
}

#[test]
fn every_edit_kind_reports_expected_outcome() {
    let config = SizeTier::Medium.config(42);
    let model = generate_problem(&config);
    let old = model.structure().expect("structure");
    for edit in [
        Edit::EditAttribute { group: 3 },
        Edit::ToggleWrapper { group: 0 },
        Edit::AddProse { group: 5 },
        Edit::AppendGroup,
        Edit::InsertGroup { at: 0 },
        Edit::InsertGroup { at: 10 },
        Edit::RemoveLastGroup,
        Edit::AddInput { group: 7 },
        Edit::SwapGroups { a: 1, b: 4 },
    ] {
        let new = apply_edit(&model, edit, &config, 9)
            .structure()
            .expect("edited structure");
        correctness::check_edit_outcome(edit, &old, &new, FIRST).expect("edit outcome");
    }
}

#[test]
fn value_preserving_edits_keep_answers() {
    let config = SizeTier::Medium.config(7);
    let model = generate_problem(&config);
    let old = model.structure().expect("structure");
    let values = generate_values(&old, 0.0, 7);
    for edit in [
        Edit::EditAttribute { group: 0 },
        Edit::ToggleWrapper { group: 1 },
        Edit::AddProse { group: 2 },
    ] {
        assert!(edit.preserves_all_values());
        let new = apply_edit(&model, edit, &config, 1)
            .structure()
            .expect("edited structure");
        let (carried, _) = rematch_values(&old, &values, &new);
        assert_eq!(carried, values, "{edit:?}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_edits_keep_invariants(seed in any::<u64>(), edit_seed in any::<u64>()) {
        let config = SizeTier::Small.config(seed);
        let model = generate_problem(&config);
        let old = model.structure().expect("structure");
        let values = generate_values(&old, config.blank_ratio, seed);

        let mut rng = StdRng::seed_from_u64(edit_seed);
        let edit = Edit::random(&model, &mut rng);
        let new = apply_edit(&model, edit, &config, edit_seed)
            .structure()
            .expect("edited structure");

        let result = rematch(&old, &new);
        let (carried, _) = rematch_values(&old, &values, &new);
        prop_assert!(correctness::check_alignment(&old, &new, &result).is_ok());
        prop_assert_eq!(
            correctness::check_carried_values(&values, &new, &result, &carried),
            Ok(())
        );
        prop_assert_eq!(
            correctness::check_edit_outcome(edit, &old, &new, FIRST),
            Ok(())
        );
    }

    #[test]
    fn identity_holds_for_any_seed(seed in any::<u64>()) {
        let structure = generate_problem(&SizeTier::Small.config(seed))
            .structure()
            .expect("structure");
        let values = generate_values(&structure, 0.3, seed);
        prop_assert_eq!(correctness::check_identity_rematch(&structure, &values), Ok(()));
    }
}
