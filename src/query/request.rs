//! Request parameters and the persisted query record
//!
//! `SearchRequest` is read fresh from the URL on every navigation.
//! `PersistedQueryState` lives for the whole session and is rewritten by the
//! normalizer before being handed to query composition.

use serde::{Deserialize, Serialize};

pub const PARAM_QINDEX: &str = "qindex";
pub const PARAM_QUERY: &str = "query";
pub const PARAM_BROWSE_POINT: &str = "browsePoint";
pub const PARAM_FILTERS: &str = "filters";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_SELECTED_BROWSE_RESULT: &str = "selectedBrowseResult";
pub const PARAM_SEGMENT: &str = "segment";

/// Index used when the URL carries no `qindex`
pub const DEFAULT_INDEX: &str = "all";

/// Sort key applied when a search names none
pub const DEFAULT_SORT: &str = "title";

/// Parameters of a single navigation, as found in the URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_index: Option<String>,
    pub query_text: Option<String>,
    pub browse_point: Option<String>,
    pub filters_text: Option<String>,
    pub sort_field: Option<String>,
    pub selected_browse_result: Option<bool>,
    pub segment: Option<String>,
}

impl SearchRequest {
    /// Parse a URL query string (with or without the leading `?`)
    ///
    /// The first occurrence of a parameter wins. Unknown parameters are ignored.
    #[must_use]
    pub fn from_query_string(search: &str) -> Self {
        let params = UrlParams::parse(search);

        Self {
            search_index: params.get(PARAM_QINDEX),
            query_text: params.get(PARAM_QUERY),
            browse_point: params.get(PARAM_BROWSE_POINT),
            filters_text: params.get(PARAM_FILTERS),
            sort_field: params.get(PARAM_SORT),
            selected_browse_result: params
                .get(PARAM_SELECTED_BROWSE_RESULT)
                .map(|value| value == "true"),
            segment: params.get(PARAM_SEGMENT),
        }
    }

    /// The search index, defaulting to `all`
    #[must_use]
    pub fn index_name(&self) -> &str {
        non_empty(self.search_index.as_deref()).unwrap_or(DEFAULT_INDEX)
    }

    /// The segment, defaulting to `instances`
    #[must_use]
    pub fn segment_name(&self) -> &str {
        non_empty(self.segment.as_deref()).unwrap_or(crate::segments::DEFAULT_SEGMENT)
    }

    /// The query text, empty when absent
    #[must_use]
    pub fn query(&self) -> &str {
        self.query_text.as_deref().unwrap_or_default()
    }
}

/// The query record kept across navigations of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQueryState {
    /// Transient index selector, always cleared by normalization
    pub qindex: String,
    pub query: String,
    pub browse_point: String,
    pub filters: String,
    pub sort: String,
    pub selected_browse_result: bool,
}

impl PersistedQueryState {
    /// Look up a field by its URL parameter name, used by template placeholders
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            PARAM_QINDEX => Some(&self.qindex),
            PARAM_QUERY => Some(&self.query),
            PARAM_BROWSE_POINT => Some(&self.browse_point),
            PARAM_FILTERS => Some(&self.filters),
            PARAM_SORT => Some(&self.sort),
            PARAM_SELECTED_BROWSE_RESULT => Some(if self.selected_browse_result { "true" } else { "false" }),
            _ => None,
        }
    }
}

/// Decoded URL query parameters, in order of appearance
#[derive(Debug, Clone, Default)]
pub struct UrlParams(Vec<(String, String)>);

impl UrlParams {
    #[must_use]
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        Self(
            url::form_urlencoded::parse(search.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        )
    }

    /// First value of `name`, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
