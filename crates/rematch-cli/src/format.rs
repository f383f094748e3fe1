/// Stderr notes: human-readable and JSON (NDJSON) modes.
///
/// The core library never prints. It reports what happened to each response
/// group as a [`GroupOutcome`]; this module turns those outcomes into notes
/// on stderr.
///
/// - **Human mode** (default): one line per note, tagged `[W]` for groups
///   whose answers were reset or discarded and `[I]` for aligned groups.
///   Colors are disabled when `--no-color` is set, the `NO_COLOR`
///   environment variable is present (per <https://no-color.org>), or stderr
///   is not a TTY.
/// - **JSON mode**: each note is one serialized [`GroupOutcome`] per line.
///
/// Quiet mode suppresses every note and summary; aligned groups and timing
/// are only shown in verbose mode.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use rematch_core::{BlankReason, GroupOutcome, MatchKind, RematchSummary};

use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for stderr notes, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Output mode of the notes.
    pub mode: OutputFormat,
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
    /// Emit timing and aligned-group notes.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(mode: OutputFormat, no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            mode,
            colors: mode == OutputFormat::Human && colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_owned()
        }
    }
}

// ---------------------------------------------------------------------------
// Group outcomes
// ---------------------------------------------------------------------------

/// Describes a blank reason in a few words.
pub fn describe_reason(reason: &BlankReason) -> String {
    match reason {
        BlankReason::Added => "new group, no recorded answers".to_owned(),
        BlankReason::GroupCountChanged => {
            "number of groups changed and this group may have shifted".to_owned()
        }
        BlankReason::Reordered { from } => format!("group moved here from position {from}"),
        BlankReason::InputCountChanged { old, new } => {
            format!("number of inputs changed from {old} to {new}")
        }
    }
}

fn describe_kind(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Exact => "unchanged",
        MatchKind::Structural => "attributes edited",
        MatchKind::Positional => "matched by position",
    }
}

/// Writes one note for `outcome` to `writer`.
///
/// Aligned groups are only reported in verbose mode; nothing is written in
/// quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_outcome<W: Write>(
    writer: &mut W,
    outcome: &GroupOutcome,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet || (!outcome.is_degraded() && !config.verbose) {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Json => {
            let line = serde_json::to_string(outcome).map_err(std::io::Error::other)?;
            writeln!(writer, "{line}")
        }
        OutputFormat::Human => {
            let (tag, color, text) = match outcome {
                GroupOutcome::Aligned { kind, leaves, .. } => (
                    "[I]",
                    ANSI_CYAN,
                    format!("kept {leaves} answer(s), {}", describe_kind(*kind)),
                ),
                GroupOutcome::Blanked { reason, .. } => {
                    ("[W]", ANSI_YELLOW, format!("answers reset: {}", describe_reason(reason)))
                }
                GroupOutcome::Dropped { leaves, .. } => (
                    "[W]",
                    ANSI_YELLOW,
                    format!("group removed, {leaves} answer(s) discarded"),
                ),
            };
            writeln!(
                writer,
                "{} group {}  {text}",
                config.paint(color, tag),
                outcome.sequence_index()
            )
        }
    }
}

/// Writes the rematch summary line.
///
/// Human format: `1 group kept, 1 reset, 0 removed; 2 answers carried`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    summary: &RematchSummary,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Json => {
            let mut obj = serde_json::Map::new();
            obj.insert(
                "summary".to_owned(),
                serde_json::to_value(summary).map_err(std::io::Error::other)?,
            );
            writeln!(writer, "{}", serde_json::Value::Object(obj))
        }
        OutputFormat::Human => writeln!(
            writer,
            "{} {} kept, {} reset, {} removed; {} {} carried",
            summary.groups_aligned,
            pluralize(summary.groups_aligned, "group", "groups"),
            summary.groups_blanked,
            summary.groups_dropped,
            summary.leaves_aligned,
            pluralize(summary.leaves_aligned, "answer", "answers"),
        ),
    }
}

/// Paints a verdict word for human output.
pub fn paint_verdict(verdict: rematch_core::Verdict, config: &FormatterConfig) -> String {
    let color = if verdict.is_pass() { ANSI_GREEN } else { ANSI_RED };
    config.paint(color, &verdict.to_string())
}

/// Writes timing information in verbose human mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose || config.mode == OutputFormat::Json {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}
