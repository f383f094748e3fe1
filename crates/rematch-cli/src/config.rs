//! Problem shape configuration.
//!
//! Without `--shape` the built-in [`ProblemShape::default`] is used. A shape
//! file is JSON; omitted fields keep their defaults:
//!
//! ```json
//! {"wrapper_tags": ["text", "div"], "first_group_index": 1}
//! ```
use std::path::{Path, PathBuf};

use rematch_core::ProblemShape;

use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::read_input;

/// Loads the problem shape named by `--shape`, or the default shape.
///
/// # Errors
///
/// Returns [`CliError::InvalidShape`] if the file cannot be read or is not a
/// valid shape document.
pub fn load_shape(path: Option<&Path>, max_size: u64) -> Result<ProblemShape, CliError> {
    let Some(path) = path else {
        return Ok(ProblemShape::default());
    };
    let content = read_input(&PathOrStdin::Path(PathBuf::from(path)), max_size).map_err(|e| {
        CliError::InvalidShape {
            detail: e.message().trim_start_matches("error: ").to_owned(),
        }
    })?;
    parse_shape(&content).map_err(|detail| CliError::InvalidShape {
        detail: format!("{}: {detail}", path.display()),
    })
}

/// Parses a shape document, rejecting shapes that could never find an input.
fn parse_shape(content: &str) -> Result<ProblemShape, String> {
    let shape: ProblemShape = serde_json::from_str(content).map_err(|e| e.to_string())?;
    if shape.response_tags.is_empty() {
        return Err("response_tags must not be empty".to_owned());
    }
    if shape.input_tags.is_empty() {
        return Err("input_tags must not be empty".to_owned());
    }
    if let Some(tag) = shape
        .wrapper_tags
        .iter()
        .find(|t| shape.response_tags.contains(*t) || shape.input_tags.contains(*t))
    {
        return Err(format!("wrapper tag `{tag}` is also a response or input tag"));
    }
    Ok(shape)
}
