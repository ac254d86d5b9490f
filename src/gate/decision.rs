//! Fetch decisions based on index and query history

use super::navigation::{FacetSnapshot, GateParams, Navigation};
use crate::query::DEFAULT_SORT;

/// Decides whether a navigation needs a fresh fetch
///
/// Called at most once per distinct navigation by [`FetchGate`](super::FetchGate).
pub trait FetchDecision {
    fn decide(&mut self, navigation: &Navigation, facets: &FacetSnapshot) -> bool;
}

/// Last seen `(qindex, query)` pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexHistory {
    pub qindex: Option<String>,
    pub query: Option<String>,
}

impl IndexHistory {
    /// Decide for `params` and return the history to use next time
    ///
    /// Switching index alone does not fetch. It does when the form was reset,
    /// the query changed, or a browse result was selected. Any navigation on
    /// the same index fetches.
    #[must_use]
    pub fn decide(&self, params: &GateParams, facets: &FacetSnapshot) -> (Self, bool) {
        let fetch = if self.qindex == params.qindex {
            true
        } else {
            is_reset(params, facets)
                || self.query != params.query
                || params.selected_browse_result.as_deref() == Some("true")
        };

        let next = Self {
            qindex: params.qindex.clone(),
            query: params.query.clone(),
        };
        (next, fetch)
    }
}

/// The form has been cleared back to its initial state
#[must_use]
pub fn is_reset(params: &GateParams, facets: &FacetSnapshot) -> bool {
    let blank = |value: &Option<String>| value.as_deref().is_none_or(str::is_empty);

    blank(&params.qindex)
        && blank(&params.query)
        && blank(&params.filters)
        && blank(&params.browse_point)
        && params.sort.as_deref().is_none_or(|sort| sort.is_empty() || sort == DEFAULT_SORT)
        && facets.is_empty()
}

/// Default decision: compares each navigation with the previous one
#[derive(Debug, Clone, Default)]
pub struct IndexChangeDecision {
    history: IndexHistory,
}

impl IndexChangeDecision {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn history(&self) -> &IndexHistory {
        &self.history
    }
}

impl FetchDecision for IndexChangeDecision {
    fn decide(&mut self, navigation: &Navigation, facets: &FacetSnapshot) -> bool {
        let params = navigation.gate_params();
        let (next, fetch) = self.history.decide(&params, facets);

        tracing::debug!(
            key = %navigation.key,
            previous_index = ?self.history.qindex,
            index = ?params.qindex,
            fetch,
            "fetch decision"
        );

        self.history = next;
        fetch
    }
}
