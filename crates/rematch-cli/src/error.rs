/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `rematch` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read or parse an
///   input (file, markup, record, report or shape) and no domain logic ran.
/// - Exit code **1**: logical failure. The tool ran to completion but the
///   result is a well-defined failure (a verdict other than PASS).
use std::fmt;
use std::path::PathBuf;

use rematch_core::{MatchError, Verdict};

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `rematch` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// Label of the source.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// More than one positional argument asked for stdin.
    StdinUsedTwice,

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// Label of the source (or `"stdout"` for write failures).
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// Problem markup could not be parsed.
    MalformedMarkup {
        /// Label of the source.
        source: String,
        /// Parser message.
        detail: String,
    },

    /// The problem parsed but two inputs resolve to the same external id.
    MalformedTree {
        /// Label of the source.
        source: String,
        /// Description of the collision.
        detail: String,
    },

    /// A JSON input (record or grading report) could not be deserialized.
    ParseFailed {
        /// Label of the source.
        source: String,
        /// Deserializer message, including line and column.
        detail: String,
    },

    /// The `--shape` file could not be read or deserialized.
    InvalidShape {
        /// Description of the problem.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// A content test ran to completion with a verdict other than PASS.
    ///
    /// The verdict has already been printed; this variant exists so `main`
    /// can exit with status 1.
    VerdictNotPass {
        /// The verdict reached.
        verdict: Verdict,
    },
}

impl CliError {
    /// Maps a [`MatchError`] raised while reading `source` to an input error.
    pub fn from_match_error(source: &str, e: &MatchError) -> Self {
        match e {
            MatchError::Markup(inner) => Self::MalformedMarkup {
                source: source.to_owned(),
                detail: inner.to_string(),
            },
            MatchError::DuplicateLeafId { .. } => Self::MalformedTree {
                source: source.to_owned(),
                detail: e.to_string(),
            },
        }
    }

    /// Maps a `serde_json` error raised while reading `source`.
    pub fn from_json_error(source: &str, e: &serde_json::Error) -> Self {
        Self::ParseFailed {
            source: source.to_owned(),
            detail: format!("line {}, column {}: {e}", e.line(), e.column()),
        }
    }

    /// Wraps a failed write to stdout or stderr.
    pub fn output(e: &std::io::Error) -> Self {
        Self::IoError {
            source: "stdout".to_owned(),
            detail: e.to_string(),
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// - `2`: input failure (file not found, malformed markup, etc.).
    /// - `1`: logical failure (verdict not PASS).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinUsedTwice
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::MalformedMarkup { .. }
            | Self::MalformedTree { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidShape { .. } => 2,

            Self::VerdictNotPass { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinUsedTwice => "error: stdin (`-`) can be used for one input only".to_owned(),
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::MalformedMarkup { source, detail } => {
                format!("error: malformed markup in {source}: {detail}")
            }
            Self::MalformedTree { source, detail } => {
                format!("error: {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: failed to parse {source}: {detail}")
            }
            Self::InvalidShape { detail } => {
                format!("error: invalid problem shape: {detail}")
            }
            Self::VerdictNotPass { verdict } => {
                format!("error: content test verdict is {verdict}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
