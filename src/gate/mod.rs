//! Fetch gating for navigation events
//!
//! A [`FetchGate`] is owned by one resource container and asked on every
//! render whether the records should be fetched again. Two layers:
//!
//! - a memo keyed on the navigation key and result offset, so re-renders of
//!   the same navigation return the cached answer without re-deciding
//! - a [`FetchDecision`], by default [`IndexChangeDecision`], which suppresses
//!   fetches while the user only switches the search index
//!
//! ```
//! use cqlnav::gate::{FacetSnapshot, FetchGate, Navigation};
//!
//! let mut gate = FetchGate::new();
//! let facets = FacetSnapshot::empty();
//!
//! assert!(gate.should_fetch(&Navigation::new("a", "qindex=title&query=cat", 0), &facets));
//! // switching index without changing the query waits for a submit
//! assert!(!gate.should_fetch(&Navigation::new("b", "qindex=subject&query=cat", 0), &facets));
//! ```

pub mod decision;
pub mod navigation;

pub use decision::{FetchDecision, IndexChangeDecision, IndexHistory, is_reset};
pub use navigation::{FacetSnapshot, GateParams, Navigation};

/// Result remembered for one `(key, offset)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
struct NavigationMark {
    key: String,
    result_offset: u64,
    fetch: bool,
}

/// Memo of the last navigation seen by a gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationMemo {
    last: Option<NavigationMark>,
}

impl NavigationMemo {
    /// Cached answer for this navigation, if it is the one last seen
    #[must_use]
    pub fn lookup(&self, navigation: &Navigation) -> Option<bool> {
        self.last
            .as_ref()
            .filter(|mark| mark.key == navigation.key && mark.result_offset == navigation.result_offset)
            .map(|mark| mark.fetch)
    }

    /// Remember the answer for this navigation
    pub fn record(&mut self, navigation: &Navigation, fetch: bool) {
        self.last = Some(NavigationMark {
            key: navigation.key.clone(),
            result_offset: navigation.result_offset,
            fetch,
        });
    }
}

/// Decides, per navigation, whether a network fetch is needed
#[derive(Debug, Clone, Default)]
pub struct FetchGate<D = IndexChangeDecision> {
    memo: NavigationMemo,
    decision: D,
}

impl FetchGate {
    /// Gate with the default index-change decision
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: FetchDecision> FetchGate<D> {
    /// Gate with a custom decision
    pub fn with_decision(decision: D) -> Self {
        Self {
            memo: NavigationMemo::default(),
            decision,
        }
    }

    /// Whether `navigation` should trigger a fetch
    ///
    /// Repeated calls for the same key and offset return the cached answer
    /// and do not consult the decision.
    pub fn should_fetch(&mut self, navigation: &Navigation, facets: &FacetSnapshot) -> bool {
        if let Some(fetch) = self.memo.lookup(navigation) {
            tracing::trace!(key = %navigation.key, fetch, "fetch decision from memo");
            return fetch;
        }

        let fetch = self.decision.decide(navigation, facets);
        self.memo.record(navigation, fetch);
        fetch
    }

    #[must_use]
    pub const fn decision(&self) -> &D {
        &self.decision
    }
}
