//! Query-building error types
//!
//! Only configuration mistakes are errors here. Malformed user input is
//! never rejected: it degrades to the most permissive valid query.
//!
//! # Error Types
//!
//! - **`UnknownIndex`**: the `qindex` is not registered for the segment
//! - **`Segment`**: the segment itself could not be resolved (wraps `SegmentError`)

use thiserror::Error;

/// Errors raised while turning a request into CQL
#[derive(Debug, Error)]
pub enum QueryError {
    /// Search index is not registered for the segment
    #[error("Unknown search index '{0}'")]
    UnknownIndex(String),

    /// Segment lookup failed
    #[error("Segment error: {0}")]
    Segment(#[from] crate::segments::SegmentError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
