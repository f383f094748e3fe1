//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in error messages: `-` for stdin, the path otherwise.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` writes plain text to stdout and group notes to stderr. `Json`
/// writes a single JSON object to stdout and NDJSON notes to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// All top-level subcommands exposed by the `rematch` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Print the full and structural hash of a problem.
    Hash {
        /// Path to problem markup, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Remove wrapper elements from problem markup, keeping their content.
    Strip {
        /// Path to problem markup, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Wrapper tag to remove (repeatable). Defaults to the problem
        /// shape's wrapper tags.
        #[arg(long = "wrapper", value_name = "TAG")]
        wrappers: Vec<String>,
    },

    /// List the external id of every input in a problem.
    Ids {
        /// Path to problem markup, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Location id prefixed to every external id.
        #[arg(long, value_name = "ID", default_value = "")]
        root_id: String,
    },

    /// Carry a content-test record's answers over to edited markup.
    ///
    /// Prints the rebuilt record as JSON on stdout; group-level notes about
    /// answers that were reset go to stderr.
    Rematch {
        /// Path to the record JSON, or `-` for stdin.
        #[arg(value_name = "RECORD")]
        record: PathOrStdin,
        /// Path to the new problem markup (cannot be `-` if RECORD is `-`).
        #[arg(value_name = "NEW_MARKUP")]
        new_markup: PathOrStdin,
    },

    /// Classify a grading report against a record's expected outcome.
    ///
    /// Exits 0 on PASS and 1 on FAIL or ERROR.
    Verdict {
        /// Path to the record JSON, or `-` for stdin.
        #[arg(value_name = "RECORD")]
        record: PathOrStdin,
        /// Path to the grading report JSON (cannot be `-` if RECORD is `-`).
        #[arg(value_name = "REPORT")]
        report: PathOrStdin,
    },
}

/// Root CLI struct for the `rematch` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "rematch",
    version,
    about = "Structural hashing and answer rematching for problem markup",
    long_about = "Hashes, normalizes and numbers the inputs of problem markup, and keeps\n\
                  recorded content-test answers valid as the markup is edited."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: timing and aligned-group notes
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `REMATCH_MAX_FILE_SIZE` environment variable.
    /// Default: 16777216 (16 MB).
    #[arg(
        long,
        global = true,
        env = "REMATCH_MAX_FILE_SIZE",
        default_value = "16777216"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// JSON file overriding the response, input and wrapper tag sets.
    ///
    /// Can also be set via the `REMATCH_SHAPE` environment variable.
    #[arg(long, global = true, env = "REMATCH_SHAPE", value_name = "FILE")]
    pub shape: Option<PathBuf>,
}
