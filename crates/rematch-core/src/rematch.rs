/// Structural rematching of recorded leaf values.
///
/// Given the problem structure a set of values was recorded against and a
/// new version of that problem, the engine decides whether the structure
/// changed and, leaf by leaf, which old external id each new leaf inherits
/// its value from.
///
/// # Scope
///
/// - Whole-problem structural hash comparison (identity fast path).
/// - Group pairing by sequence index, tolerant of tag and attribute edits at
///   a fixed position.
/// - Conservative handling of insertion, removal and reordering of groups:
///   groups that cannot be traced start blank instead of inheriting values
///   from an unrelated group.
/// - Per-group outcome reporting so callers can tell authors which answers
///   were reset.
mod engine;
mod matching;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{carry_forward, rematch, rematch_values};
pub use types::{BlankReason, GroupOutcome, MatchKind, RematchResult, RematchSummary};
