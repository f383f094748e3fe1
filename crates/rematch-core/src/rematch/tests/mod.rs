#![allow(clippy::expect_used)]

mod scenario_tests;

use crate::ids::encode;
use crate::problem::{ProblemShape, ProblemStructure};
use crate::values::LeafValueMap;

/// The two-input problem the recorded answers in these tests belong to.
pub(crate) const ADD_TWO: &str = r#"<problem>
  <p>Enter two integers that sum to 10.</p>
  <customresponse cfa="test_add_to_ten">
    <textline size="40" correct_answer="3" label="Integer #1"/><br/>
    <textline size="40" correct_answer="7" label="Integer #2"/>
  </customresponse>
  <script type="loncapa/python">
def test_add_to_ten(expect, ans):
    return test_add(10, ans)
  </script>
</problem>"#;

pub(crate) fn structure(markup: &str) -> ProblemStructure {
    structure_with_root("", markup)
}

pub(crate) fn structure_with_root(root: &str, markup: &str) -> ProblemStructure {
    ProblemStructure::from_markup(root, markup, &ProblemShape::default()).expect("structure")
}

/// Builds a value map from `(seq, idx, value)` triples under the empty root.
pub(crate) fn values(entries: &[(u32, u32, &str)]) -> LeafValueMap {
    entries
        .iter()
        .map(|&(seq, idx, v)| (encode("", seq, idx), v.to_owned()))
        .collect()
}

/// The answers recorded against [`ADD_TWO`].
pub(crate) fn recorded() -> LeafValueMap {
    values(&[(2, 1, "5"), (2, 2, "174440041")])
}

/// Renders a value map as `(id, value)` string pairs for compact asserts.
pub(crate) fn pairs(map: &LeafValueMap) -> Vec<(String, String)> {
    map.iter()
        .map(|(id, v)| (id.as_str().to_owned(), v.to_owned()))
        .collect()
}

/// A problem made of `customresponse` groups with the given input counts.
pub(crate) fn groups_markup(groups: &[(&str, usize)]) -> String {
    let mut xml = String::from("<problem>");
    for (cfa, inputs) in groups {
        xml.push_str(&format!(r#"<customresponse cfa="{cfa}">"#));
        for _ in 0..*inputs {
            xml.push_str(r#"<textline size="40"/>"#);
        }
        xml.push_str("</customresponse>");
    }
    xml.push_str("</problem>");
    xml
}
