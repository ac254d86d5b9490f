//! Index, sort and filter definitions for a segment
//!
//! A segment (instances, holdings, items) decides which search indexes are
//! valid, how sort keys map onto backend fields and which filters can be
//! turned into CQL clauses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A search index and the CQL template registered for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexTemplate {
    /// Value carried by the `qindex` URL parameter
    pub name: String,

    /// Human readable label
    #[serde(default)]
    pub label: String,

    /// CQL template with `%{query.<field>}` placeholders
    pub template: String,
}

impl IndexTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            template: template.into(),
        }
    }
}

/// A filter that can appear in the `filters` URL parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterDefinition {
    /// Name used in `filters=<name>.<value>`
    pub name: String,

    /// CQL field the filter compares against
    pub cql: String,

    /// Relation used in the clause (`=`, `==`)
    #[serde(default = "default_operator")]
    pub operator: String,

    /// Optional mapping from URL values to CQL values
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

fn default_operator() -> String {
    "=".to_string()
}

impl FilterDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, cql: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cql: cql.into(),
            operator: operator.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add a value mapping (builder style)
    #[must_use]
    pub fn with_value(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.values.insert(from.into(), to.into());
        self
    }

    /// Map a URL value to its CQL value, falling back to the value itself
    #[must_use]
    pub fn cql_value<'a>(&'a self, value: &'a str) -> &'a str {
        self.values.get(value).map_or(value, String::as_str)
    }
}

/// Everything a segment exposes to query building
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexConfig {
    #[serde(default)]
    pub indexes: Vec<IndexTemplate>,

    /// Sort key to backend sort field(s)
    #[serde(default)]
    pub sort_map: BTreeMap<String, String>,

    #[serde(default)]
    pub filters: Vec<FilterDefinition>,
}

impl IndexConfig {
    /// Find the index registered under `name` (exact match)
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexTemplate> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Find the filter definition registered under `name`
    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&FilterDefinition> {
        self.filters.iter().find(|filter| filter.name == name)
    }

    /// Whether `name` is a valid index for this segment
    #[must_use]
    pub fn has_index(&self, name: &str) -> bool {
        self.index(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_lookup_is_exact() {
        let config = IndexConfig {
            indexes: vec![IndexTemplate::new("title", "Title", "title all \"%{query.query}\"")],
            ..Default::default()
        };

        assert!(config.has_index("title"));
        assert!(!config.has_index("Title"));
        assert!(!config.has_index("titl"));
    }

    #[test]
    fn test_filter_value_mapping() {
        let filter = FilterDefinition::new("staffSuppress", "staffSuppress", "==")
            .with_value("true", "true")
            .with_value("yes", "true");

        assert_eq!(filter.cql_value("yes"), "true");
        assert_eq!(filter.cql_value("no"), "no");
    }

    #[test]
    fn test_filter_operator_defaults_when_missing() {
        let filter: FilterDefinition = toml::from_str(
            r#"
            name = "language"
            cql = "languages"
            "#,
        )
        .unwrap();

        assert_eq!(filter.operator, "=");
        assert!(filter.values.is_empty());
    }
}
