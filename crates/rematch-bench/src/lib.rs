//! Problem generator and benchmark utilities for rematch.
//!
//! This crate provides deterministic generation of capa-style problems,
//! authoring edits, and invariant checkers for benchmarking and
//! property-based testing of `rematch-core`.

pub mod correctness;
pub mod generator;

pub use generator::edits::{Edit, apply_edit};
pub use generator::{
    GeneratorConfig, ProblemModel, SizeTier, generate_problem, generate_record, generate_values,
};
