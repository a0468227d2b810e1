//! Core pipeline and domain logic for weekmerge.
//!
//! Each component of the merge lives in its own module; [`pipeline`] ties
//! them together into the end-to-end `merge_notes` workflow.

pub mod assembler;
pub mod cleanup;
pub mod materializer;
pub mod pipeline;
pub mod renderer;
pub mod selector;

pub use pipeline::{MergeResult, ProgressReporter, SilentProgress, merge_notes};
