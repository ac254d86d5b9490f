//! cqlnav - CQL query construction and fetch gating for search and browse views
//!
//! This library turns the URL state of a search/browse form into a CQL query,
//! picks the backend path to query, and decides on every navigation whether
//! a network fetch is needed at all.
//!
//! # Modules
//!
//! - [`segments`]: index, sort and filter configuration per record segment
//! - [`query`]: request parsing, normalization, template resolution, CQL composition
//! - [`gate`]: fetch gating for navigation events
//! - [`manifest`]: resource declarations and the [`SearchSession`](manifest::SearchSession)
//! - [`config`]: application settings
//!
//! # Examples
//!
//! ```
//! use cqlnav::gate::{FacetSnapshot, Navigation};
//! use cqlnav::manifest::{Manifest, ResourceRequest, FetchRuntime, SearchSession};
//! use cqlnav::segments::SegmentRegistry;
//!
//! struct Log(Vec<String>);
//! impl FetchRuntime for Log {
//!     fn fetch(&mut self, request: &ResourceRequest) {
//!         self.0.push(request.query.clone().unwrap_or_default());
//!     }
//! }
//!
//! let mut session = SearchSession::new(SegmentRegistry::builtin(), Manifest::default());
//! let mut log = Log(Vec::new());
//! let nav = Navigation::new("k1", "qindex=title&query=dune&filters=language.eng", 0);
//! session.navigate(&nav, &FacetSnapshot::empty(), &mut log).unwrap();
//!
//! assert_eq!(log.0, vec![r#"(title all "dune") and languages=="eng" sortby title"#]);
//! ```

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod gate;
pub mod manifest;
pub mod query;
pub mod segments;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum CqlnavError {
    /// Query construction error
    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),
    /// Segment configuration error
    #[error("Segment error: {0}")]
    Segment(#[from] segments::SegmentError),
    /// Manifest or session error
    #[error("Manifest error: {0}")]
    Manifest(#[from] manifest::ManifestError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON input or output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
