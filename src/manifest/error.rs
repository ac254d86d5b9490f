//! Manifest and session error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    /// No resource with this name is declared
    #[error("Unknown resource '{0}'")]
    UnknownResource(String),

    /// Resource cannot be requested this way
    #[error("Resource '{0}' is fetched through the fetch gate")]
    GatedResource(String),

    /// Query could not be built
    #[error("Query error: {0}")]
    Query(#[from] crate::query::QueryError),

    /// Segment configuration lookup failed
    #[error("Segment error: {0}")]
    Segment(#[from] crate::segments::SegmentError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
