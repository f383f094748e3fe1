//! Pass/fail classification of a graded submission against an expected outcome.
//!
//! The classifier never computes correctness itself. It consumes the output of
//! an external grading collaborator (a [`GradingReport`]) together with the
//! submitted values, and decides whether the submission behaved as the
//! content test expected.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ExternalId;
use crate::values::LeafValueMap;

/// The outcome a content test expects from grading its submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Expectation {
    /// Every answered input grades as correct.
    Correct,
    /// Every answered input grades as incorrect.
    Incorrect,
    /// The grader reports an error for the submission.
    Error,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => f.write_str("CORRECT"),
            Self::Incorrect => f.write_str("INCORRECT"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// Result of classifying a graded submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The submission behaved as expected.
    Pass,
    /// The submission did not behave as expected.
    Fail,
    /// The grading output could not be classified (for example, an answered
    /// input has no correctness entry).
    Error,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Pass`].
    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Fail => f.write_str("FAIL"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// Output of the grading collaborator for one submission.
///
/// Serialized with a `status` tag:
///
/// ```json
/// {"status": "graded", "correctness": {"p_2_1": true, "p_2_2": false}}
/// {"status": "error", "message": "checker raised ZeroDivisionError"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradingReport {
    /// Per-leaf correctness. Blank leaves may be absent.
    Graded {
        /// Leaf external id → correct?
        correctness: BTreeMap<ExternalId, bool>,
    },
    /// The grader failed on this submission as a whole.
    Error {
        /// Grader-supplied description.
        message: String,
    },
}

/// How the answered leaves of a submission graded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Answered leaves graded correct.
    pub correct: usize,
    /// Answered leaves graded incorrect.
    pub incorrect: usize,
    /// Leaves with a blank value; never graded.
    pub blank: usize,
    /// Answered leaves with no correctness entry.
    pub ungraded: Vec<ExternalId>,
}

/// A verdict together with the evidence it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    /// The classification.
    pub verdict: Verdict,
    /// The expectation it was classified against.
    pub expectation: Expectation,
    /// Per-leaf counts; empty when the grader reported an error.
    pub tally: Tally,
    /// The grader's error message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading_error: Option<String>,
}

/// Classifies a graded submission. See [`assess`] for the rules.
pub fn classify(
    values: &LeafValueMap,
    report: &GradingReport,
    expectation: Expectation,
) -> Verdict {
    assess(values, report, expectation).verdict
}

/// Classifies a graded submission and reports the tally behind the verdict.
///
/// Rules:
///
/// - Leaves with a blank value are excluded from the tally.
/// - An answered leaf missing from the correctness map yields
///   [`Verdict::Error`], whatever the expectation.
/// - [`Expectation::Correct`] passes iff every answered leaf is correct.
/// - [`Expectation::Incorrect`] passes iff every answered leaf is incorrect.
/// - A submission with no answered leaf passes both of these.
/// - [`Expectation::Error`] passes iff the grader reported an error.
/// - A grader error fails both `Correct` and `Incorrect` expectations; it
///   is never counted as an incorrect answer.
///
/// A mixed map (some correct, some incorrect) therefore always fails.
pub fn assess(
    values: &LeafValueMap,
    report: &GradingReport,
    expectation: Expectation,
) -> Assessment {
    let correctness = match report {
        GradingReport::Error { message } => {
            let verdict = match expectation {
                Expectation::Error => Verdict::Pass,
                Expectation::Correct | Expectation::Incorrect => Verdict::Fail,
            };
            return Assessment {
                verdict,
                expectation,
                tally: Tally::default(),
                grading_error: Some(message.clone()),
            };
        }
        GradingReport::Graded { correctness } => correctness,
    };

    let mut tally = Tally::default();
    for (id, value) in values.iter() {
        if value.is_empty() {
            tally.blank += 1;
            continue;
        }
        match correctness.get(id) {
            Some(true) => tally.correct += 1,
            Some(false) => tally.incorrect += 1,
            None => tally.ungraded.push(id.clone()),
        }
    }

    let verdict = if !tally.ungraded.is_empty() {
        Verdict::Error
    } else {
        let passed = match expectation {
            Expectation::Correct => tally.incorrect == 0,
            Expectation::Incorrect => tally.correct == 0,
            Expectation::Error => false,
        };
        if passed { Verdict::Pass } else { Verdict::Fail }
    };

    Assessment {
        verdict,
        expectation,
        tally,
        grading_error: None,
    }
}
