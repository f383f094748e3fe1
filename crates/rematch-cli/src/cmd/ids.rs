//! Implementation of `rematch ids <file> --root-id <id>`.
//!
//! Lists every response group of a problem and the external id of each of
//! its inputs, in document order. These are the keys a recorded answer map
//! for the problem uses.
//!
//! Exit codes: 0 = success, 2 = unreadable or malformed markup.
use serde::Serialize;

use rematch_core::{ExternalId, ProblemShape, ProblemStructure};

use crate::OutputFormat;
use crate::cmd::{print_json, structure_of};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct InputListing {
    id: ExternalId,
    index_within_group: u32,
    tag: String,
}

#[derive(Debug, Serialize)]
struct GroupListing {
    sequence_index: u32,
    tag: String,
    inputs: Vec<InputListing>,
}

#[derive(Debug, Serialize)]
struct IdListing {
    root_id: String,
    groups: Vec<GroupListing>,
}

fn listing(structure: &ProblemStructure) -> IdListing {
    IdListing {
        root_id: structure.root_id().to_owned(),
        groups: structure
            .groups()
            .iter()
            .map(|group| GroupListing {
                sequence_index: group.sequence_index,
                tag: group.node.tag.clone(),
                inputs: group
                    .inputs
                    .iter()
                    .map(|leaf| InputListing {
                        id: structure.external_id(group, leaf),
                        index_within_group: leaf.index_within_group,
                        tag: leaf.node.tag.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Runs the `ids` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the markup cannot be parsed.
pub fn run(
    content: &str,
    source: &str,
    root_id: &str,
    shape: &ProblemShape,
    format: OutputFormat,
) -> Result<(), CliError> {
    let structure = structure_of(root_id, content, source, shape)?;
    let listing = listing(&structure);
    match format {
        OutputFormat::Json => print_json(&listing),
        OutputFormat::Human => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_human(&mut out, &listing).map_err(|e| CliError::output(&e))
        }
    }
}

fn write_human<W: std::io::Write>(w: &mut W, listing: &IdListing) -> std::io::Result<()> {
    for group in &listing.groups {
        writeln!(w, "group {}  {}", group.sequence_index, group.tag)?;
        for input in &group.inputs {
            writeln!(w, "  {}  {}", input.id, input.tag)?;
        }
    }
    Ok(())
}
