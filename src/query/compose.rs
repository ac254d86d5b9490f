//! Final CQL composition
//!
//! Fills the resolved fragment with values from the persisted state, appends
//! filter clauses and the `sortby` clause.
//!
//! ```
//! use cqlnav::query::{FailPolicy, PersistedQueryState, QueryComposer};
//! use cqlnav::segments::builtin;
//!
//! let config = builtin::instances();
//! let state = PersistedQueryState {
//!     query: "dune".to_string(),
//!     filters: "language.eng".to_string(),
//!     sort: "title".to_string(),
//!     ..Default::default()
//! };
//! let cql = QueryComposer::new(&config, FailPolicy::Never)
//!     .compose(r#"title all "%{query.query}""#, &state, true)
//!     .unwrap();
//! assert_eq!(cql, r#"(title all "dune") and languages=="eng" sortby title"#);
//! ```

use super::request::{PARAM_QUERY, PersistedQueryState};
use crate::segments::{FilterDefinition, IndexConfig};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Query used when there is neither query text nor a filter
pub const CQL_FIND_ALL: &str = "cql.allRecords=1";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{query\.(\w+)\}").expect("placeholder pattern is valid"));

/// When composition gives up and produces no query at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailPolicy {
    /// Always produce a query, falling back to match-all
    #[default]
    Never,
    /// No query without query text and filters
    NoQueryNoFilters,
}

/// Composes final CQL for one segment
#[derive(Debug, Clone, Copy)]
pub struct QueryComposer<'a> {
    sort_map: &'a BTreeMap<String, String>,
    filters: &'a [FilterDefinition],
    fail_policy: FailPolicy,
}

impl<'a> QueryComposer<'a> {
    #[must_use]
    pub fn new(config: &'a IndexConfig, fail_policy: FailPolicy) -> Self {
        Self {
            sort_map: &config.sort_map,
            filters: &config.filters,
            fail_policy,
        }
    }

    /// Build the CQL for `fragment` and `state`
    ///
    /// Returns `None` when the fail policy rules the request out.
    #[must_use]
    pub fn compose(&self, fragment: &str, state: &PersistedQueryState, escape: bool) -> Option<String> {
        let no_query = state.query.is_empty();
        let no_filters = state.filters.is_empty();
        if self.fail_policy == FailPolicy::NoQueryNoFilters && no_query && no_filters {
            return None;
        }

        let query_cql = (!no_query).then(|| fill_template(fragment, state, escape));
        let filter_cql = self.filter_clauses(&state.filters);

        let mut cql = match (query_cql, filter_cql) {
            (Some(query), Some(filters)) => format!("({query}) and {filters}"),
            (Some(query), None) => query,
            (None, Some(filters)) => filters,
            (None, None) => CQL_FIND_ALL.to_string(),
        };

        if let Some(sort) = self.sort_clause(&state.sort) {
            cql.push_str(" sortby ");
            cql.push_str(&sort);
        }

        Some(cql)
    }

    /// CQL for a `name.value,name.value` filter string
    ///
    /// Values of the same filter are OR-ed, filters are AND-ed. Unknown
    /// filters are skipped.
    #[must_use]
    pub fn filter_clauses(&self, filters: &str) -> Option<String> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for (name, value) in filters.split(',').filter_map(|entry| entry.split_once('.')) {
            match groups.iter_mut().find(|(group, _)| *group == name) {
                Some((_, values)) => values.push(value),
                None => groups.push((name, vec![value])),
            }
        }

        let clauses: Vec<String> = groups
            .into_iter()
            .filter_map(|(name, values)| {
                let Some(definition) = self.filters.iter().find(|f| f.name == name) else {
                    tracing::warn!(filter = name, "skipping unknown filter");
                    return None;
                };
                Some(filter_clause(definition, &values))
            })
            .collect();

        (!clauses.is_empty()).then(|| clauses.join(" and "))
    }

    /// Sort keys mapped to backend fields, `-key` meaning descending
    #[must_use]
    pub fn sort_clause(&self, sort: &str) -> Option<String> {
        let keys: Vec<String> = sort
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                let (key, descending) = key.strip_prefix('-').map_or((key, false), |k| (k, true));
                let fields = self.sort_map.get(key).map_or(key, String::as_str);
                if descending {
                    fields
                        .split_whitespace()
                        .map(|field| format!("{field}/sort.descending"))
                        .collect::<Vec<_>>()
                        .join(" ")
                } else {
                    fields.to_string()
                }
            })
            .collect();

        (!keys.is_empty()).then(|| keys.join(" "))
    }
}

fn filter_clause(definition: &FilterDefinition, values: &[&str]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|value| format!("\"{}\"", definition.cql_value(value)))
        .collect();

    if let [single] = quoted.as_slice() {
        format!("{}{}{single}", definition.cql, definition.operator)
    } else {
        format!("{}{}({})", definition.cql, definition.operator, quoted.join(" or "))
    }
}

/// Replace `%{query.<field>}` placeholders with state values
#[must_use]
pub fn fill_template(template: &str, state: &PersistedQueryState, escape: bool) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let field = &caps[1];
            let value = state.field(field).unwrap_or_default();
            if escape && field == PARAM_QUERY {
                escape_cql(value)
            } else {
                value.to_string()
            }
        })
        .into_owned()
}

/// Escape backslashes and double quotes for use inside a quoted CQL term
#[must_use]
pub fn escape_cql(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', r#"\""#)
}
