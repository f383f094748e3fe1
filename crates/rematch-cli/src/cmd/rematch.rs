//! Implementation of `rematch rematch <record> <new_markup>`.
//!
//! Reads a content-test record (JSON) and an edited version of its problem,
//! carries the recorded answers over to the new structure and prints the
//! rebuilt record on stdout. Groups whose answers were reset or discarded are
//! reported on stderr, followed by a summary line.
//!
//! In `--format json` mode stdout carries the full outcome (record, whether
//! the markup changed, and per-group alignment details) instead of the bare
//! record.
//!
//! Exit codes: 0 = success (including degraded rematches), 2 = unreadable
//! record or markup.
use rematch_core::{ContentTestRecord, ProblemShape, RematchOutcome};

use crate::OutputFormat;
use crate::cmd::{print_json, structure_of};
use crate::error::CliError;
use crate::format::{FormatterConfig, write_outcome, write_summary};

/// Parses a record document.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] if `content` is not a valid record.
pub fn parse_record(content: &str, source: &str) -> Result<ContentTestRecord, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::from_json_error(source, &e))
}

/// Rebuilds `record` against `new_markup`.
///
/// # Errors
///
/// Returns [`CliError::MalformedMarkup`] or [`CliError::MalformedTree`],
/// naming whichever input is at fault.
pub fn rematch_record(
    record: &ContentTestRecord,
    record_source: &str,
    new_markup: &str,
    markup_source: &str,
    shape: &ProblemShape,
) -> Result<RematchOutcome, CliError> {
    let old = structure_of(&record.root_id, &record.markup, record_source, shape)?;
    let new = structure_of(&record.root_id, new_markup, markup_source, shape)?;
    Ok(record.rematched_from(&old, &new, new_markup))
}

/// Runs the `rematch` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if either input cannot be parsed.
pub fn run(
    record_content: &str,
    record_source: &str,
    markup_content: &str,
    markup_source: &str,
    shape: &ProblemShape,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let record = parse_record(record_content, record_source)?;
    let outcome = rematch_record(&record, record_source, markup_content, markup_source, shape)?;

    match config.mode {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Human => print_json(&outcome.record)?,
    }

    let stderr = std::io::stderr();
    let mut err = stderr.lock();
    for group in &outcome.result.groups {
        write_outcome(&mut err, group, config).map_err(|e| CliError::output(&e))?;
    }
    write_summary(&mut err, &outcome.result.summary(), config).map_err(|e| CliError::output(&e))
}
