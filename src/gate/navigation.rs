//! Navigation events and facet snapshots consumed by the fetch gate

use crate::query::request::{
    PARAM_BROWSE_POINT, PARAM_FILTERS, PARAM_QINDEX, PARAM_QUERY, PARAM_SELECTED_BROWSE_RESULT, PARAM_SORT,
};
use crate::query::{SearchRequest, UrlParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One navigation of a resource container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    /// Opaque identity, new for every history entry
    pub key: String,

    /// Raw URL query string
    #[serde(default)]
    pub search: String,

    /// Pagination offset of the result list
    #[serde(default)]
    pub result_offset: u64,
}

impl Navigation {
    #[must_use]
    pub fn new(key: impl Into<String>, search: impl Into<String>, result_offset: u64) -> Self {
        Self {
            key: key.into(),
            search: search.into(),
            result_offset,
        }
    }

    /// Parsed request parameters
    #[must_use]
    pub fn request(&self) -> SearchRequest {
        SearchRequest::from_query_string(&self.search)
    }

    /// Raw parameters the gate compares
    #[must_use]
    pub fn gate_params(&self) -> GateParams {
        let params = UrlParams::parse(&self.search);
        GateParams {
            qindex: params.get(PARAM_QINDEX),
            query: params.get(PARAM_QUERY),
            browse_point: params.get(PARAM_BROWSE_POINT),
            filters: params.get(PARAM_FILTERS),
            sort: params.get(PARAM_SORT),
            selected_browse_result: params.get(PARAM_SELECTED_BROWSE_RESULT),
        }
    }
}

/// URL parameters exactly as found, absent and empty kept apart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateParams {
    pub qindex: Option<String>,
    pub query: Option<String>,
    pub browse_point: Option<String>,
    pub filters: Option<String>,
    pub sort: Option<String>,
    pub selected_browse_result: Option<String>,
}

/// Read-only view of pending facet selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetSnapshot {
    settings: BTreeMap<String, Vec<String>>,
}

impl FacetSnapshot {
    /// Snapshot with no pending selections
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a pending selection (builder style)
    #[must_use]
    pub fn with_selection(mut self, facet: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.entry(facet.into()).or_default().push(value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
