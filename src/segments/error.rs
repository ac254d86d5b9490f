//! Error types for segment configuration lookups

use thiserror::Error;

/// Errors raised while loading or looking up segment configuration
#[derive(Debug, Error)]
pub enum SegmentError {
    /// No configuration is registered for the segment
    #[error("Unknown segment '{0}'")]
    UnknownSegment(String),

    /// A segment definition is unusable
    #[error("Invalid segment '{0}': {1}")]
    Invalid(String, String),

    /// Configuration source could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
