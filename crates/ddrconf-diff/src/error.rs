//! Error types for the comparison engine.
//!
//! A structural mismatch between two tables is an [`Outcome`](crate::Outcome),
//! not an error. The variants here only describe failures of the common-subset
//! recursion, which are recovered by abandoning that branch.

use serde::Serialize;

/// Errors that can occur while comparing the common subset of two tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompareError {
    /// The common-register count seen from the left disagrees with the
    /// count seen from the right.
    #[error("internal error: common register counts don't match ({left} vs {right})")]
    InternalConsistency { left: usize, right: usize },

    /// A temporary common-subset list could not be allocated.
    #[error("memory allocation failed for {requested} common registers")]
    ResourceExhausted { requested: usize },
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
