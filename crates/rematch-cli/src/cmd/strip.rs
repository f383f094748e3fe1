//! Implementation of `rematch strip <file> [--wrapper TAG]...`.
//!
//! Removes every non-root element with one of the given tags from the markup,
//! splicing its content into the parent. Text, comments and the rest of the
//! markup are passed through unchanged. Without `--wrapper` the shape's
//! wrapper tags are used.
//!
//! Exit codes: 0 = success, 2 = unreadable or malformed markup.
use rematch_core::StripWrapper as _;

use crate::OutputFormat;
use crate::cmd::print_json;
use crate::error::CliError;

/// Strips each tag of `wrappers` from `markup`, in order.
///
/// # Errors
///
/// Returns [`CliError::MalformedMarkup`] if the markup cannot be read.
pub fn strip_all(markup: &str, source: &str, wrappers: &[String]) -> Result<String, CliError> {
    let mut current = markup.to_owned();
    for tag in wrappers {
        current = current
            .as_str()
            .strip_wrapper(tag)
            .map_err(|e| CliError::MalformedMarkup {
                source: source.to_owned(),
                detail: e.to_string(),
            })?;
    }
    Ok(current)
}

/// Runs the `strip` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 2 if the markup cannot be parsed.
pub fn run(
    content: &str,
    source: &str,
    wrappers: &[String],
    format: OutputFormat,
) -> Result<(), CliError> {
    let stripped = strip_all(content, source, wrappers)?;
    match format {
        OutputFormat::Json => {
            let mut obj = serde_json::Map::new();
            obj.insert("markup".to_owned(), serde_json::Value::String(stripped));
            obj.insert(
                "wrappers".to_owned(),
                serde_json::Value::Array(
                    wrappers
                        .iter()
                        .map(|w| serde_json::Value::String(w.clone()))
                        .collect(),
                ),
            );
            print_json(&serde_json::Value::Object(obj))
        }
        OutputFormat::Human => {
            use std::io::Write as _;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let newline = if stripped.ends_with('\n') { "" } else { "\n" };
            write!(out, "{stripped}{newline}").map_err(|e| CliError::output(&e))
        }
    }
}
