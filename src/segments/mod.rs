//! Index and filter configuration per segment
//!
//! A segment is a logical record category (instances, holdings, items). Each
//! one exposes the search indexes a user may pick, the sort-key mapping and
//! the filter definitions used when composing CQL.
//!
//! # Examples
//!
//! ```
//! use cqlnav::segments::{IndexConfigProvider, SegmentRegistry};
//!
//! let registry = SegmentRegistry::builtin();
//! let config = registry.index_config("instances").unwrap();
//! assert!(config.has_index("title"));
//! ```
//!
//! Segments can be overridden from a TOML file:
//!
//! ```toml
//! [segments.instances]
//! sort_map = { title = "title" }
//!
//! [[segments.instances.indexes]]
//! name = "all"
//! template = 'keyword all "%{query.query}"'
//! ```

pub mod builtin;
pub mod error;
pub mod types;

pub use error::SegmentError;
pub use types::{FilterDefinition, IndexConfig, IndexTemplate};

use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Segment used when the URL does not name one
pub const DEFAULT_SEGMENT: &str = builtin::INSTANCES;

/// Source of index, sort and filter configuration
///
/// Lookups are pure: the same segment always yields the same configuration.
pub trait IndexConfigProvider {
    /// Configuration for `segment`
    ///
    /// # Errors
    ///
    /// Returns `SegmentError::UnknownSegment` if nothing is registered for it.
    fn index_config(&self, segment: &str) -> Result<&IndexConfig, SegmentError>;
}

/// In-memory registry of segment configurations
#[derive(Debug, Clone, Default)]
pub struct SegmentRegistry {
    segments: BTreeMap<String, IndexConfig>,
}

#[derive(Debug, Deserialize)]
struct SegmentFile {
    #[serde(default)]
    segments: BTreeMap<String, IndexConfig>,
}

impl SegmentRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in instances, holdings and items segments
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(builtin::INSTANCES, builtin::instances());
        registry.insert(builtin::HOLDINGS, builtin::holdings());
        registry.insert(builtin::ITEMS, builtin::items());
        registry
    }

    /// Built-in registry with segments from a TOML file layered on top
    ///
    /// A segment present in the file replaces the built-in one entirely.
    ///
    /// # Errors
    ///
    /// Returns `SegmentError` if the file cannot be read or parsed, or if a
    /// segment in it is invalid.
    pub fn from_file(path: &Path) -> Result<Self, SegmentError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        let file: SegmentFile = settings.try_deserialize()?;

        let mut registry = Self::builtin();
        for (name, config) in file.segments {
            validate(&name, &config)?;
            tracing::debug!(segment = %name, indexes = config.indexes.len(), "loaded segment override");
            registry.insert(name, config);
        }
        Ok(registry)
    }

    /// Register or replace a segment
    pub fn insert(&mut self, name: impl Into<String>, config: IndexConfig) {
        self.segments.insert(name.into(), config);
    }

    /// Names of all registered segments
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.segments.keys().map(String::as_str).collect()
    }
}

impl IndexConfigProvider for SegmentRegistry {
    fn index_config(&self, segment: &str) -> Result<&IndexConfig, SegmentError> {
        self.segments
            .get(segment)
            .ok_or_else(|| SegmentError::UnknownSegment(segment.to_string()))
    }
}

fn validate(name: &str, config: &IndexConfig) -> Result<(), SegmentError> {
    if config.indexes.is_empty() {
        return Err(SegmentError::Invalid(name.to_string(), "no indexes defined".to_string()));
    }
    if let Some(index) = config.indexes.iter().find(|index| index.name.trim().is_empty()) {
        return Err(SegmentError::Invalid(
            name.to_string(),
            format!("index with template '{}' has no name", index.template),
        ));
    }
    if let Some(index) = config.indexes.iter().find(|index| index.template.trim().is_empty()) {
        return Err(SegmentError::Invalid(
            name.to_string(),
            format!("index '{}' has an empty template", index.name),
        ));
    }
    Ok(())
}
