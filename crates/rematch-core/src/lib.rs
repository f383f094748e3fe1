#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod condense;
pub mod hash;
pub mod ids;
pub mod markup;
pub mod problem;
pub mod record;
pub mod rematch;
pub mod serde_helpers;
pub mod tree;
pub mod values;
pub mod verdict;
pub mod wrapper;

pub use condense::{condense_attributes, condense_dict};
pub use hash::{TreeDigest, full_hash, structural_hash};
pub use ids::{ExternalId, IdError, decode, encode};
pub use markup::{MarkupError, parse_markup, to_markup};
pub use problem::{InputLeaf, MatchError, ProblemShape, ProblemStructure, ResponseGroup};
pub use record::{ContentTestRecord, Grader, RematchOutcome};
pub use rematch::{
    BlankReason, GroupOutcome, MatchKind, RematchResult, RematchSummary, carry_forward, rematch,
    rematch_values,
};
pub use tree::LabeledTree;
pub use values::LeafValueMap;
pub use verdict::{Assessment, Expectation, GradingReport, Tally, Verdict, assess, classify};
pub use wrapper::{StripWrapper, remove_wrapper, remove_wrapper_markup, remove_wrappers};

/// Returns the current version of the rematch-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
