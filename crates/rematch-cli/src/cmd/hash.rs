//! Implementation of `rematch hash <file>`.
//!
//! Parses problem markup, strips the shape's wrapper tags and prints the full
//! and structural digests of the normalized tree, together with the number of
//! response groups and inputs.
//!
//! Exit codes: 0 = success, 2 = unreadable or malformed markup.
use serde::Serialize;

use rematch_core::{ProblemShape, TreeDigest, full_hash, structural_hash};

use crate::OutputFormat;
use crate::cmd::{print_json, structure_of};
use crate::error::CliError;

/// Digests and counts for one problem.
#[derive(Debug, Serialize)]
pub struct HashReport {
    /// Digest over tags, attributes and arrangement.
    pub full: TreeDigest,
    /// Digest over tags and arrangement only.
    pub structural: TreeDigest,
    /// Number of response groups.
    pub groups: usize,
    /// Number of inputs across all groups.
    pub inputs: usize,
}

impl HashReport {
    /// Builds the report for `markup`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MalformedMarkup`] or [`CliError::MalformedTree`].
    pub fn from_markup(markup: &str, source: &str, shape: &ProblemShape) -> Result<Self, CliError> {
        let structure = structure_of("", markup, source, shape)?;
        Ok(Self {
            full: full_hash(structure.tree()),
            structural: structural_hash(structure.tree()),
            groups: structure.groups().len(),
            inputs: structure.leaf_count(),
        })
    }
}

/// Runs the `hash` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the markup cannot be parsed.
pub fn run(
    content: &str,
    source: &str,
    shape: &ProblemShape,
    format: OutputFormat,
) -> Result<(), CliError> {
    let report = HashReport::from_markup(content, source, shape)?;
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_human(&mut out, &report).map_err(|e| CliError::output(&e))
        }
    }
}

fn write_human<W: std::io::Write>(w: &mut W, report: &HashReport) -> std::io::Result<()> {
    writeln!(w, "full:        {}", report.full)?;
    writeln!(w, "structural:  {}", report.structural)?;
    writeln!(w, "groups:      {}", report.groups)?;
    writeln!(w, "inputs:      {}", report.inputs)
}
