//! Content-test records: recorded answers kept valid across problem edits.
//!
//! A [`ContentTestRecord`] pairs a problem's markup with a set of recorded
//! answers and the outcome the answers are expected to produce. When the
//! author edits the problem, [`ContentTestRecord::rematched`] moves the
//! answers onto the new structure; [`ContentTestRecord::run`] grades them
//! through an injected [`Grader`] and classifies the result.
//!
//! Records are values: every operation returns a new record and leaves the
//! receiver untouched.
use serde::{Deserialize, Serialize};

use crate::hash::full_hash;
use crate::problem::{MatchError, ProblemShape, ProblemStructure};
use crate::rematch::{RematchResult, rematch, rematch_values};
use crate::values::LeafValueMap;
use crate::verdict::{Assessment, Expectation, GradingReport, Verdict, assess};

/// The grading collaborator a record is run against.
///
/// Implementations may evaluate answers in a sandbox, call a remote service
/// or return canned data. The trait is object-safe: records take
/// `&dyn Grader`.
pub trait Grader {
    /// Grades one submission. Blank values may be left out of the
    /// correctness map; they never affect the verdict.
    fn grade(&self, values: &LeafValueMap) -> GradingReport;
}

/// A precomputed report grades every submission the same way.
impl Grader for GradingReport {
    fn grade(&self, _values: &LeafValueMap) -> GradingReport {
        self.clone()
    }
}

/// Recorded answers for one problem, with their expected outcome.
///
/// Serialized form (the CLI's on-disk record format):
///
/// ```json
/// {
///   "root_id": "i4x-MITx-999-problem-Problem_4",
///   "expectation": "CORRECT",
///   "markup": "<problem>...</problem>",
///   "values": {"i4x-MITx-999-problem-Problem_4_2_1": "5"},
///   "verdict": "PASS"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTestRecord {
    /// Location id of the problem; prefix of every leaf id.
    pub root_id: String,
    /// Outcome the recorded answers should produce.
    pub expectation: Expectation,
    /// The markup the values were recorded against.
    pub markup: String,
    /// Recorded answers keyed by leaf external id.
    #[serde(default)]
    pub values: LeafValueMap,
    /// Verdict of the last run, cleared whenever the values are rematched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

/// The result of [`ContentTestRecord::rematched`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RematchOutcome {
    /// The record rebuilt against the new markup.
    pub record: ContentTestRecord,
    /// `false` when the new markup hashed equal to the recorded one; only the
    /// stored markup was replaced.
    pub markup_changed: bool,
    /// Group-level alignment details.
    pub result: RematchResult,
}

impl ContentTestRecord {
    /// Creates a record whose values cover exactly the leaves of `markup`.
    ///
    /// Leaves missing from `values` are recorded blank; entries naming no
    /// leaf of the problem are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the markup cannot be parsed or yields
    /// duplicate leaf ids.
    pub fn new(
        root_id: impl Into<String>,
        expectation: Expectation,
        markup: impl Into<String>,
        values: &LeafValueMap,
        shape: &ProblemShape,
    ) -> Result<Self, MatchError> {
        let root_id = root_id.into();
        let markup = markup.into();
        let structure = ProblemStructure::from_markup(&root_id, &markup, shape)?;
        Ok(Self {
            values: LeafValueMap::for_structure(&structure, values),
            root_id,
            expectation,
            markup,
            verdict: None,
        })
    }

    /// The structure of the recorded markup.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the stored markup is unparseable.
    pub fn structure(&self, shape: &ProblemShape) -> Result<ProblemStructure, MatchError> {
        ProblemStructure::from_markup(&self.root_id, &self.markup, shape)
    }

    /// Moves the recorded values onto `new_markup`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if either markup is unparseable or malformed.
    pub fn rematched(
        &self,
        new_markup: &str,
        shape: &ProblemShape,
    ) -> Result<RematchOutcome, MatchError> {
        let old = self.structure(shape)?;
        let new = ProblemStructure::from_markup(&self.root_id, new_markup, shape)?;
        Ok(self.rematched_from(&old, &new, new_markup))
    }

    /// Moves the recorded values onto `new`, the already extracted
    /// structure of `new_markup`. `old` must be this record's structure.
    ///
    /// If the full hashes match, only text outside the hashed tree changed:
    /// the values and verdict are kept and the stored markup is replaced.
    /// Otherwise the values are rematched and carried forward, the markup is
    /// replaced and the verdict is cleared.
    pub fn rematched_from(
        &self,
        old: &ProblemStructure,
        new: &ProblemStructure,
        new_markup: &str,
    ) -> RematchOutcome {
        if full_hash(old.tree()) == full_hash(new.tree()) {
            return RematchOutcome {
                record: Self {
                    markup: new_markup.to_owned(),
                    values: LeafValueMap::for_structure(new, &self.values),
                    ..self.clone()
                },
                markup_changed: false,
                result: rematch(old, new),
            };
        }

        let (values, result) = rematch_values(old, &self.values, new);
        RematchOutcome {
            record: Self {
                root_id: self.root_id.clone(),
                expectation: self.expectation,
                markup: new_markup.to_owned(),
                values,
                verdict: None,
            },
            markup_changed: true,
            result,
        }
    }

    /// Grades the recorded values with `grader` and classifies the outcome.
    pub fn run(&self, grader: &dyn Grader) -> Assessment {
        let report = grader.grade(&self.values);
        assess(&self.values, &report, self.expectation)
    }

    /// Returns a copy of the record with `verdict` stored.
    pub fn with_verdict(&self, verdict: Verdict) -> Self {
        Self {
            verdict: Some(verdict),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::cell::Cell;

    use super::*;
    use crate::ids::{ExternalId, encode};

    const ROOT: &str = "i4x-MITx-999-problem-Problem_4";

    const MARKUP: &str = r#"<problem>
  <customresponse cfa="test_add_to_ten">
    <textline size="40" correct_answer="3"/>
    <textline size="40" correct_answer="7"/>
  </customresponse>
</problem>"#;

    fn id(seq: u32, idx: u32) -> ExternalId {
        encode(ROOT, seq, idx)
    }

    fn record() -> ContentTestRecord {
        let mut values = LeafValueMap::new();
        values.insert(id(2, 1), "5");
        values.insert(id(2, 2), "174440041");
        ContentTestRecord::new(
            ROOT,
            Expectation::Correct,
            MARKUP,
            &values,
            &ProblemShape::default(),
        )
        .expect("record")
    }

    /// Grades every answer equal to `"correct"` as correct.
    struct EqualsCorrect {
        calls: Cell<usize>,
    }

    impl Grader for EqualsCorrect {
        fn grade(&self, values: &LeafValueMap) -> GradingReport {
            self.calls.set(self.calls.get() + 1);
            GradingReport::Graded {
                correctness: values
                    .answered()
                    .map(|(id, v)| (id.clone(), v == "correct"))
                    .collect(),
            }
        }
    }

    #[test]
    fn new_fills_missing_leaves_and_drops_unknown_ids() {
        let mut values = LeafValueMap::new();
        values.insert(id(2, 1), "5");
        values.insert(id(9, 9), "stray");
        let r = ContentTestRecord::new(
            ROOT,
            Expectation::Correct,
            MARKUP,
            &values,
            &ProblemShape::default(),
        )
        .expect("record");
        assert_eq!(r.values.len(), 2);
        assert_eq!(r.values.get(&id(2, 1)), Some("5"));
        assert_eq!(r.values.get(&id(2, 2)), Some(""));
        assert!(!r.values.contains(&id(9, 9)));
    }

    #[test]
    fn unchanged_markup_keeps_verdict() {
        let r = record().with_verdict(Verdict::Pass);
        let out = r
            .rematched(MARKUP, &ProblemShape::default())
            .expect("rematch");
        assert!(!out.markup_changed);
        assert_eq!(out.record, r);
        assert!(!out.result.structure_changed);
    }

    #[test]
    fn text_only_edit_stores_new_markup_and_keeps_verdict() {
        let r = record().with_verdict(Verdict::Pass);
        let edited = MARKUP.replace(
            "<problem>",
            "<problem>\n  <!-- reviewed -->\n  Enter two integers that sum to 10.",
        );
        let out = r
            .rematched(&edited, &ProblemShape::default())
            .expect("rematch");
        assert!(!out.markup_changed);
        assert_eq!(out.record.markup, edited);
        assert_eq!(out.record.verdict, Some(Verdict::Pass));
        assert_eq!(out.record.values, r.values);
    }

    #[test]
    fn rematched_from_prebuilt_structures_matches_rematched() {
        let r = record();
        let edited = MARKUP.replace("test_add_to_ten", "test_add_to_10");
        let shape = ProblemShape::default();
        let old = r.structure(&shape).expect("old");
        let new = ProblemStructure::from_markup(ROOT, &edited, &shape).expect("new");
        let from = r.rematched_from(&old, &new, &edited);
        let parsed = r.rematched(&edited, &shape).expect("rematch");
        assert_eq!(from.record, parsed.record);
        assert!(from.markup_changed);
        assert_eq!(from.record.values, r.values);
    }

    #[test]
    fn edited_markup_carries_values_and_clears_verdict() {
        let r = record().with_verdict(Verdict::Pass);
        let edited = MARKUP.replace(r#"size="40" correct_answer="3""#, r#"size="20" correct_answer="3""#);
        let out = r
            .rematched(&edited, &ProblemShape::default())
            .expect("rematch");
        assert!(out.markup_changed);
        assert_eq!(out.record.verdict, None);
        assert_eq!(out.record.markup, edited);
        assert_eq!(out.record.values, r.values);
        assert_eq!(r.verdict, Some(Verdict::Pass), "receiver untouched");
    }

    #[test]
    fn added_input_blanks_group() {
        let edited = MARKUP.replace(
            "  </customresponse>",
            "    <textline size=\"40\"/>\n  </customresponse>",
        );
        let out = record()
            .rematched(&edited, &ProblemShape::default())
            .expect("rematch");
        assert_eq!(out.record.values.values(), ["", "", ""]);
    }

    #[test]
    fn malformed_new_markup_is_an_error() {
        let err = record()
            .rematched("<problem><customresponse>", &ProblemShape::default())
            .expect_err("unclosed");
        assert!(matches!(err, MatchError::Markup(_)));
    }

    #[test]
    fn run_uses_injected_grader() {
        let mut r = record();
        r.values.insert(id(2, 1), "correct");
        r.values.insert(id(2, 2), "correct");
        let grader = EqualsCorrect {
            calls: Cell::new(0),
        };
        let a = r.run(&grader);
        assert_eq!(a.verdict, Verdict::Pass);
        assert_eq!(grader.calls.get(), 1);

        r.values.insert(id(2, 2), "wrong");
        assert_eq!(r.run(&grader).verdict, Verdict::Fail);
    }

    #[test]
    fn canned_report_acts_as_grader() {
        let mut r = record();
        r.expectation = Expectation::Error;
        let report = GradingReport::Error {
            message: "timeout".to_owned(),
        };
        assert_eq!(r.run(&report).verdict, Verdict::Pass);
    }

    #[test]
    fn record_json_round_trip() {
        let r = record().with_verdict(Verdict::Fail);
        let json = serde_json::to_string(&r).expect("serialize");
        assert!(json.contains(r#""expectation":"CORRECT""#));
        assert!(json.contains(r#""verdict":"FAIL""#));
        let back: ContentTestRecord = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, r);
    }

    #[test]
    fn record_without_values_deserializes() {
        let r: ContentTestRecord = serde_json::from_str(
            r#"{"root_id": "p", "expectation": "INCORRECT", "markup": "<problem/>"}"#,
        )
        .expect("parse");
        assert!(r.values.is_empty());
        assert_eq!(r.verdict, None);
    }
}
