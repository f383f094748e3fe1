use super::super::engine::{carry_forward, rematch, rematch_values};
use super::{ADD_TWO, pairs, recorded, structure, structure_with_root, values};
use crate::ids::encode;
use crate::values::LeafValueMap;

fn kv(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|&(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// Re-parsing the same problem keeps every value and reports no change.
#[test]
fn unchanged_problem_is_identity() {
    let old = structure(ADD_TWO);
    let new = structure(ADD_TWO);
    let result = rematch(&old, &new);
    assert!(!result.structure_changed);
    assert_eq!(result.alignment.len(), 2);
    for (o, n) in &result.alignment {
        assert_eq!(o, n);
    }
    let carried = carry_forward(&result, &recorded(), &new);
    assert_eq!(carried, recorded());
}

/// An extra unrelated attribute leaves the structure and values intact.
#[test]
fn extra_attribute_keeps_values() {
    let old = structure(ADD_TWO);
    let edited = ADD_TWO.replace(
        r#"<customresponse cfa="test_add_to_ten">"#,
        r#"<customresponse cfa="test_add_to_ten" data-reviewed="yes">"#,
    );
    let new = structure(&edited);
    let (carried, result) = rematch_values(&old, &recorded(), &new);
    assert!(!result.structure_changed);
    assert_eq!(
        pairs(&carried),
        kv(&[("_2_1", "5"), ("_2_2", "174440041")])
    );
}

/// Fixing a typo in the checker name at the same position keeps values.
#[test]
fn renamed_checker_keeps_values() {
    let old = structure(ADD_TWO);
    let new = structure(&ADD_TWO.replace("test_add_to_ten", "test_add_to_10"));
    let (carried, _) = rematch_values(&old, &recorded(), &new);
    assert_eq!(carried, recorded());
}

/// Adding a third input to the only group blanks the whole group.
#[test]
fn input_added_to_group_blanks_group() {
    let old = structure(ADD_TWO);
    let edited = ADD_TWO.replace(
        r#"<textline size="40" correct_answer="7" label="Integer #2"/>"#,
        r#"<textline size="40" correct_answer="7" label="Integer #2"/><textline size="40" correct_answer="0" label="Integer #3"/>"#,
    );
    let new = structure(&edited);
    let (carried, result) = rematch_values(&old, &recorded(), &new);
    assert!(result.structure_changed);
    assert!(result.alignment.is_empty());
    assert_eq!(
        pairs(&carried),
        kv(&[("_2_1", ""), ("_2_2", ""), ("_2_3", "")])
    );
}

/// Appending a new group keeps the existing group and blanks the new one.
#[test]
fn appended_group_keeps_existing_values() {
    let old = structure(ADD_TWO);
    let edited = ADD_TWO.replace(
        "  <script",
        r#"  <customresponse cfa="test_add_to_ten">
    <textline size="40"/>
    <textline size="40"/>
    <textline size="40"/>
  </customresponse>
  <script"#,
    );
    let new = structure(&edited);
    let (carried, result) = rematch_values(&old, &recorded(), &new);
    assert!(result.structure_changed);
    assert_eq!(
        pairs(&carried),
        kv(&[
            ("_2_1", "5"),
            ("_2_2", "174440041"),
            ("_3_1", ""),
            ("_3_2", ""),
            ("_3_3", ""),
        ])
    );
}

/// Appending a group while fixing the checker name of the existing one keeps
/// the existing answers; the edited group did not move.
#[test]
fn appended_group_with_renamed_checker_keeps_values() {
    let old = structure(ADD_TWO);
    let edited = ADD_TWO
        .replace(r#"cfa="test_add_to_ten""#, r#"cfa="test_add_to_10""#)
        .replace(
            "  <script",
            r#"  <customresponse cfa="test_add_to_ten">
    <textline size="40"/>
  </customresponse>
  <script"#,
        );
    let new = structure(&edited);
    let (carried, result) = rematch_values(&old, &recorded(), &new);
    assert!(result.structure_changed);
    assert_eq!(carried.values(), ["5", "174440041", ""]);
    assert_eq!(
        pairs(&carried),
        kv(&[("_2_1", "5"), ("_2_2", "174440041"), ("_3_1", "")])
    );
}

/// Inserting a group before the recorded one shifts it; nothing is carried
/// into either the inserted group or the shifted one.
#[test]
fn inserted_group_blanks_shifted_groups() {
    let old = structure(ADD_TWO);
    let edited = ADD_TWO.replace(
        "  <customresponse",
        r#"  <customresponse cfa="test_add_to_ten">
    <textline size="40"/>
    <textline size="40"/>
    <textline size="40"/>
  </customresponse>
  <customresponse"#,
    );
    let new = structure(&edited);
    let (carried, result) = rematch_values(&old, &recorded(), &new);
    assert!(result.structure_changed);
    assert!(result.alignment.is_empty());
    assert_eq!(carried.len(), 5);
    assert!(carried.values().iter().all(|v| v.is_empty()));
}

/// Values recorded under a different root (the problem moved) do not carry.
#[test]
fn values_for_other_location_become_blank() {
    let old = structure_with_root("i4x-MITx-999-problem-Problem_4", ADD_TWO);
    let new = structure_with_root(
        "i4x-MITx-999-problem-Problem_4",
        &ADD_TWO.replace(
            r#"<textline size="40" correct_answer="7" label="Integer #2"/>"#,
            r#"<textline size="40" correct_answer="7" label="Integer #2"/><textline size="40"/>"#,
        ),
    );
    let mut stale = LeafValueMap::new();
    stale.insert(encode("i4x-MITx-999-problem-Problem_5", 2, 1), "5");
    stale.insert(encode("i4x-MITx-999-problem-Problem_5", 2, 2), "174440041");
    let (carried, _) = rematch_values(&old, &stale, &new);
    assert_eq!(carried.values(), ["", "", ""]);
}

/// Even when the structure is unchanged, ids are re-keyed to the new root.
#[test]
fn identity_rematch_rekeys_root() {
    let old = structure_with_root("old", ADD_TWO);
    let new = structure_with_root("new", ADD_TWO);
    let mut old_values = LeafValueMap::new();
    old_values.insert(encode("old", 2, 1), "5");
    old_values.insert(encode("old", 2, 2), "6");
    let (carried, result) = rematch_values(&old, &old_values, &new);
    assert!(!result.structure_changed);
    assert_eq!(carried.get(&encode("new", 2, 1)), Some("5"));
    assert_eq!(carried.get(&encode("new", 2, 2)), Some("6"));
}

/// Removing the last group keeps earlier values and drops the removed ones.
#[test]
fn removed_trailing_group_keeps_earlier_values() {
    let old = structure(&super::groups_markup(&[("a", 2), ("b", 1)]));
    let new = structure(&super::groups_markup(&[("a", 2)]));
    let old_values = values(&[(2, 1, "x"), (2, 2, "y"), (3, 1, "z")]);
    let (carried, result) = rematch_values(&old, &old_values, &new);
    assert!(result.structure_changed);
    assert_eq!(pairs(&carried), kv(&[("_2_1", "x"), ("_2_2", "y")]));
}

/// Paragraph edits outside every group change the structure but keep values.
#[test]
fn edits_outside_groups_keep_values() {
    let old = structure(ADD_TWO);
    let new = structure(&ADD_TWO.replace(
        "<p>Enter two integers that sum to 10.</p>",
        "<p>Enter two integers</p><p>that sum to 10.</p>",
    ));
    let (carried, result) = rematch_values(&old, &recorded(), &new);
    assert!(result.structure_changed);
    assert_eq!(carried, recorded());
}

/// Every new leaf gets an entry, even with an empty recorded map.
#[test]
fn carried_map_has_no_missing_keys() {
    let old = structure(ADD_TWO);
    let new = structure(&super::groups_markup(&[("a", 2), ("b", 4)]));
    let (carried, _) = rematch_values(&old, &LeafValueMap::new(), &new);
    assert_eq!(carried.len(), new.leaf_count());
    for id in new.leaf_ids() {
        assert!(carried.contains(&id), "missing {id}");
    }
}
