//! Implementation of `rematch verdict <record> <report>`.
//!
//! Classifies a grading report for a record's answers against the record's
//! expected outcome. Blank answers are never graded. The verdict and the
//! tally behind it are printed on stdout.
//!
//! Exit codes: 0 = PASS, 1 = FAIL or ERROR, 2 = unreadable record or report.
use rematch_core::{Assessment, ExternalId, GradingReport};

use crate::OutputFormat;
use crate::cmd::print_json;
use crate::cmd::rematch::parse_record;
use crate::error::CliError;
use crate::format::{FormatterConfig, paint_verdict};

/// Runs the `verdict` command.
///
/// # Errors
///
/// - [`CliError::ParseFailed`] if the record or report is not valid JSON of
///   the expected shape (exit 2).
/// - [`CliError::VerdictNotPass`] if the verdict is FAIL or ERROR (exit 1).
pub fn run(
    record_content: &str,
    record_source: &str,
    report_content: &str,
    report_source: &str,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let record = parse_record(record_content, record_source)?;
    let report: GradingReport = serde_json::from_str(report_content)
        .map_err(|e| CliError::from_json_error(report_source, &e))?;

    let assessment = record.run(&report);

    match config.mode {
        OutputFormat::Json => print_json(&assessment)?,
        OutputFormat::Human => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_human(&mut out, &assessment, config).map_err(|e| CliError::output(&e))?;
        }
    }

    if assessment.verdict.is_pass() {
        Ok(())
    } else {
        Err(CliError::VerdictNotPass {
            verdict: assessment.verdict,
        })
    }
}

fn write_human<W: std::io::Write>(
    w: &mut W,
    assessment: &Assessment,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let tally = &assessment.tally;
    writeln!(
        w,
        "{} (expected {}): {} correct, {} incorrect, {} blank",
        paint_verdict(assessment.verdict, config),
        assessment.expectation,
        tally.correct,
        tally.incorrect,
        tally.blank,
    )?;
    if let Some(message) = &assessment.grading_error {
        writeln!(w, "grader error: {message}")?;
    }
    if !tally.ungraded.is_empty() {
        let ids: Vec<&str> = tally.ungraded.iter().map(ExternalId::as_str).collect();
        writeln!(w, "ungraded answers: {}", ids.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use rematch_core::{Expectation, LeafValueMap, Tally, Verdict, assess, encode};

    use super::*;

    fn human() -> FormatterConfig {
        FormatterConfig {
            mode: OutputFormat::Human,
            colors: false,
            quiet: false,
            verbose: false,
        }
    }

    fn render(assessment: &Assessment) -> String {
        let mut buf = Vec::new();
        write_human(&mut buf, assessment, &human()).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn pass_line_shows_tally() {
        let a = Assessment {
            verdict: Verdict::Pass,
            expectation: Expectation::Correct,
            tally: Tally {
                correct: 2,
                incorrect: 0,
                blank: 1,
                ungraded: Vec::new(),
            },
            grading_error: None,
        };
        assert_eq!(
            render(&a),
            "PASS (expected CORRECT): 2 correct, 0 incorrect, 1 blank\n"
        );
    }

    #[test]
    fn ungraded_answers_are_listed() {
        let mut values = LeafValueMap::new();
        values.insert(encode("p", 2, 1), "x");
        let report = GradingReport::Graded {
            correctness: Default::default(),
        };
        let s = render(&assess(&values, &report, Expectation::Correct));
        assert!(s.starts_with("ERROR"), "output: {s}");
        assert!(s.contains("ungraded answers: p_2_1"), "output: {s}");
    }

    #[test]
    fn grader_error_is_shown() {
        let report = GradingReport::Error {
            message: "sandbox timeout".to_owned(),
        };
        let s = render(&assess(&LeafValueMap::new(), &report, Expectation::Error));
        assert!(s.starts_with("PASS (expected ERROR)"), "output: {s}");
        assert!(s.contains("grader error: sandbox timeout"), "output: {s}");
    }
}
