/// Command modules for the `rematch` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes already-read input and parsed arguments and returns `Ok(())`
/// on success or a [`crate::error::CliError`] on failure.
pub mod hash;
pub mod ids;
pub mod rematch;
pub mod strip;
pub mod verdict;

use rematch_core::{ProblemShape, ProblemStructure};

use crate::error::CliError;

/// Parses problem markup read from `source` into a structure.
pub(crate) fn structure_of(
    root_id: &str,
    markup: &str,
    source: &str,
    shape: &ProblemShape,
) -> Result<ProblemStructure, CliError> {
    ProblemStructure::from_markup(root_id, markup, shape)
        .map_err(|e| CliError::from_match_error(source, &e))
}

/// Writes `value` to stdout as pretty-printed JSON followed by a newline.
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    use std::io::Write as _;

    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{json}").map_err(|e| CliError::output(&e))
}
