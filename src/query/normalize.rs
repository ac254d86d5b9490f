//! Request state normalization
//!
//! Syncs the persisted query record with the incoming request, settles the
//! effective sort, applies browse defaults and asks the template resolver for
//! the CQL fragment.

use super::error::QueryError;
use super::identifiers::IdentifierType;
use super::mode::{SearchMode, has_sort_directive};
use super::request::{DEFAULT_SORT, PersistedQueryState, SearchRequest};
use super::template::TemplateResolver;
use crate::segments::IndexConfig;

/// Query value used when browsing with filters only
pub const BROWSE_MATCH_ALL: &str = "undefined";

/// Everything query composition needs besides the persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub mode: SearchMode,

    /// CQL fragment produced by the template resolver
    pub fragment: String,

    /// Escape quotes and backslashes in the query text; off for raw CQL
    pub escape: bool,

    /// The resolver consumed `selectedBrowseResult`
    pub reset_selected_browse_result: bool,
}

/// Normalize `request` against the `previous` persisted state
///
/// Returns the new persisted state and the resolved query. Only the
/// request's own `selectedBrowseResult` selects the exact contributor lookup;
/// the persisted flag is the record a reset is written to. The new state
/// always has an empty `qindex` and a settled `sort`: an explicit key, the
/// default key, or empty for browse modes and raw CQL carrying `sortby`.
///
/// # Errors
///
/// Returns `QueryError::UnknownIndex` if the request names an index that is
/// not registered in `config`.
pub fn normalize(
    previous: &PersistedQueryState,
    request: &SearchRequest,
    config: &IndexConfig,
    identifier_types: &[IdentifierType],
) -> Result<(PersistedQueryState, NormalizedQuery), QueryError> {
    let index = request.index_name();
    let mode = SearchMode::from_index(index);

    // qindex is recomputed from the URL on every navigation
    let mut state = PersistedQueryState {
        qindex: String::new(),
        query: request.query().to_string(),
        browse_point: request.browse_point.clone().unwrap_or_default(),
        filters: request.filters_text.clone().unwrap_or_default(),
        sort: request.sort_field.clone().unwrap_or_default(),
        selected_browse_result: request
            .selected_browse_result
            .unwrap_or(previous.selected_browse_result),
    };

    let mut template_value = state.query.clone();
    let mut browse_point = Some(state.browse_point.clone());

    if mode.is_browse() && state.query.is_empty() && !state.filters.is_empty() {
        state.query = BROWSE_MATCH_ALL.to_string();
        template_value = BROWSE_MATCH_ALL.to_string();
        browse_point = None;
    }

    let resolution = TemplateResolver::new(config, identifier_types).resolve(
        index,
        &template_value,
        browse_point.as_deref(),
        request.selected_browse_result == Some(true),
    )?;

    if mode.is_raw() && has_sort_directive(&state.query) {
        state.sort.clear();
    } else if state.sort.is_empty() {
        state.sort = DEFAULT_SORT.to_string();
    }

    // browse results are ordered by the browse point
    if mode.is_browse() {
        state.sort.clear();
    }

    if resolution.reset_selected_browse_result {
        state.selected_browse_result = false;
    }

    tracing::debug!(
        index,
        sort = %state.sort,
        reset_selected_browse_result = resolution.reset_selected_browse_result,
        "normalized request state"
    );

    let normalized = NormalizedQuery {
        escape: !mode.is_raw(),
        mode,
        fragment: resolution.fragment,
        reset_selected_browse_result: resolution.reset_selected_browse_result,
    };

    Ok((state, normalized))
}
