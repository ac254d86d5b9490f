//! Resource definitions and their per-request parameter functions

use crate::query::{BrowseKind, SearchMode, SearchRequest, is_field_comparison};
use serde::Serialize;

/// Placeholder the fetch runtime replaces with the current offset
pub const RESULT_OFFSET_PLACEHOLDER: &str = "%{resultOffset}";

/// Where a resource is fetched from
#[derive(Debug, Clone, Copy)]
pub enum ResourcePath {
    Static(&'static str),
    /// Computed per request; `None` leaves the resource inactive
    PerRequest(fn(&SearchRequest) -> Option<&'static str>),
}

impl ResourcePath {
    #[must_use]
    pub fn resolve(&self, request: &SearchRequest) -> Option<&'static str> {
        match self {
            Self::Static(path) => Some(*path),
            Self::PerRequest(path) => path(request),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Static(path) => (*path).to_string(),
            Self::PerRequest(_) => "<per request>".to_string(),
        }
    }
}

/// Key of the records array in the response
#[derive(Debug, Clone, Copy)]
pub enum RecordsKey {
    Static(&'static str),
    PerRequest(fn(&SearchRequest) -> &'static str),
}

impl RecordsKey {
    #[must_use]
    pub fn resolve(&self, request: &SearchRequest) -> &'static str {
        match self {
            Self::Static(key) => *key,
            Self::PerRequest(key) => key(request),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Static(key) => (*key).to_string(),
            Self::PerRequest(_) => "<per request>".to_string(),
        }
    }
}

/// When the runtime fetches a resource on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchPolicy {
    /// Only on explicit request (exports)
    Never,
    /// Whenever the fetch gate allows it
    Gated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultDensity {
    Sparse,
}

/// Paging shape of an accumulating resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub per_request: u32,
    pub result_offset: &'static str,
    pub result_density: Option<ResultDensity>,
}

/// Which dynamic parameters a resource sends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicParams {
    pub query: bool,
    pub highlight_match: bool,
    pub preceding_records_count: bool,
}

/// A named resource of the manifest
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    pub name: &'static str,
    pub path: ResourcePath,
    pub records: RecordsKey,
    pub pagination: Option<Pagination>,
    pub accumulate: bool,
    pub fetch: FetchPolicy,
    /// Backend errors are reported through the runtime, never raised
    pub throw_errors: bool,
    pub params: DynamicParams,
    /// Send the request without parameters when no query can be built
    pub static_fallback: bool,
}

/// Serializable description of a resource
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceShape {
    pub name: &'static str,
    pub path: String,
    pub records: String,
    pub pagination: Option<Pagination>,
    pub accumulate: bool,
    pub fetch: FetchPolicy,
    pub throw_errors: bool,
    pub params: DynamicParams,
}

impl ResourceDefinition {
    #[must_use]
    pub fn shape(&self) -> ResourceShape {
        ResourceShape {
            name: self.name,
            path: self.path.describe(),
            records: self.records.describe(),
            pagination: self.pagination,
            accumulate: self.accumulate,
            fetch: self.fetch,
            throw_errors: self.throw_errors,
            params: self.params,
        }
    }
}

/// A request handed to the fetch runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub resource: String,
    pub path: String,
    pub records: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preceding_records_count: Option<u32>,
}

/// Browse endpoints are used for browse indexes and relational queries
#[must_use]
pub fn is_browse_request(request: &SearchRequest) -> bool {
    SearchMode::from_index(request.index_name()).is_browse() || is_field_comparison(request.query())
}

/// Free-text queries are highlighted, relational expressions are not
#[must_use]
pub fn highlight_match(request: &SearchRequest) -> bool {
    let query = request.query();
    !query.is_empty() && !is_field_comparison(query)
}

/// Number of records to fetch before a browse anchor
#[must_use]
pub fn preceding_records_count(request: &SearchRequest, count: u32) -> Option<u32> {
    is_browse_request(request).then_some(count)
}

/// Records array key: browse responses carry `items`
#[must_use]
pub fn records_key(request: &SearchRequest) -> &'static str {
    if is_browse_request(request) { "items" } else { "instances" }
}

/// Search endpoint, inactive while browsing
#[must_use]
pub fn search_path(request: &SearchRequest) -> Option<&'static str> {
    match SearchMode::from_index(request.index_name()) {
        SearchMode::RangeBrowse(_) => None,
        _ => Some("search/instances"),
    }
}

/// Browse endpoint for the selected browse kind
#[must_use]
pub fn browse_path(request: &SearchRequest) -> Option<&'static str> {
    SearchMode::from_index(request.index_name())
        .browse_kind()
        .map(BrowseKind::path)
}
