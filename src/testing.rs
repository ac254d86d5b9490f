//! Testing utilities for cqlnav
//!
//! Stand-ins for the collaborators a session talks to: a fetch decision that
//! counts its invocations and a fetch runtime that records every request.
//!
//! Only available when compiled with `cfg(test)`.

use crate::gate::{FacetSnapshot, FetchDecision, Navigation};
use crate::manifest::{FetchRuntime, ResourceRequest};
use crate::query::IdentifierType;

/// Fetch decision with a fixed answer that counts how often it was asked
///
/// # Examples
/// ```ignore
/// let mut gate = FetchGate::with_decision(CountingDecision::answering(true));
/// gate.should_fetch(&Navigation::new("k", "", 0), &FacetSnapshot::empty());
/// assert_eq!(gate.decision().calls(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingDecision {
    answer: bool,
    calls: usize,
}

impl CountingDecision {
    #[must_use]
    pub const fn answering(answer: bool) -> Self {
        Self { answer, calls: 0 }
    }

    /// Number of times the decision was evaluated
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }
}

impl FetchDecision for CountingDecision {
    fn decide(&mut self, _navigation: &Navigation, _facets: &FacetSnapshot) -> bool {
        self.calls += 1;
        self.answer
    }
}

/// Fetch runtime that keeps every request it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingRuntime {
    pub requests: Vec<ResourceRequest>,
}

impl FetchRuntime for RecordingRuntime {
    fn fetch(&mut self, request: &ResourceRequest) {
        self.requests.push(request.clone());
    }
}

/// Identifier types as a typical inventory backend reports them
#[must_use]
pub fn sample_identifier_types() -> Vec<IdentifierType> {
    vec![
        IdentifierType::new("8261054f-be78-422d-bd51-4ed9f33c3422", "ISBN"),
        IdentifierType::new("fcca2643-406a-482a-b760-7a7f8aec640e", "Invalid ISBN"),
        IdentifierType::new("913300b2-03ed-469a-8179-c1092c991227", "ISSN"),
        IdentifierType::new("7fbd5d84-62d1-44c6-9c45-6cb173998bbd", "OCLC"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_decision() {
        let mut decision = CountingDecision::answering(true);
        assert!(decision.decide(&Navigation::new("a", "", 0), &FacetSnapshot::empty()));
        assert!(decision.decide(&Navigation::new("a", "", 0), &FacetSnapshot::empty()));
        assert_eq!(decision.calls(), 2);
    }

    #[test]
    fn test_sample_identifier_types() {
        let types = sample_identifier_types();
        assert_eq!(types.iter().filter(|t| t.name.to_lowercase().contains("isbn")).count(), 2);
    }
}
