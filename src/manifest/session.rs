//! Search session: one resource container and its navigation loop
//!
//! Owns the persisted query state and the fetch gate. On each navigation
//! the gate decides first; only then is the request normalized, the CQL
//! composed and the fetch runtime invoked for every active resource.

use super::error::ManifestError;
use super::resource::{FetchPolicy, ResourceDefinition, ResourceRequest, highlight_match, preceding_records_count};
use super::Manifest;
use crate::gate::{FacetSnapshot, FetchGate, Navigation};
use crate::query::{
    FailPolicy, IdentifierType, NormalizedQuery, PersistedQueryState, QueryComposer, SearchRequest, normalize,
};
use crate::segments::{IndexConfig, IndexConfigProvider};

/// The HTTP side: receives fully resolved requests
///
/// Implementations own error reporting, retries and cancellation.
pub trait FetchRuntime {
    fn fetch(&mut self, request: &ResourceRequest);
}

/// Per-navigation inputs shared by every resource request
struct RequestContext<'a> {
    request: &'a SearchRequest,
    navigation: &'a Navigation,
    config: &'a IndexConfig,
    normalized: &'a NormalizedQuery,
    state: &'a PersistedQueryState,
    preceding_records_count: u32,
}

impl RequestContext<'_> {
    fn build(&self, resource: &ResourceDefinition) -> Option<ResourceRequest> {
        let path = resource.path.resolve(self.request)?;

        let query = if resource.params.query {
            let query = QueryComposer::new(self.config, FailPolicy::NoQueryNoFilters).compose(
                &self.normalized.fragment,
                self.state,
                self.normalized.escape,
            );
            if query.is_none() && !resource.static_fallback {
                tracing::debug!(resource = resource.name, "no query to run, skipping");
                return None;
            }
            query
        } else {
            None
        };

        // a fallback request carries no parameters at all
        let with_params = query.is_some() || !resource.params.query;

        Some(ResourceRequest {
            resource: resource.name.to_string(),
            path: path.to_string(),
            records: resource.records.resolve(self.request).to_string(),
            query,
            limit: resource.pagination.map(|p| p.per_request),
            offset: if resource.pagination.is_some() { self.navigation.result_offset } else { 0 },
            highlight_match: (with_params && resource.params.highlight_match)
                .then(|| highlight_match(self.request)),
            preceding_records_count: if with_params && resource.params.preceding_records_count {
                preceding_records_count(self.request, self.preceding_records_count)
            } else {
                None
            },
        })
    }
}

/// One active search view
pub struct SearchSession<P> {
    provider: P,
    manifest: Manifest,
    gate: FetchGate,
    state: PersistedQueryState,
    identifier_types: Vec<IdentifierType>,
}

impl<P: IndexConfigProvider> SearchSession<P> {
    #[must_use]
    pub fn new(provider: P, manifest: Manifest) -> Self {
        let state = manifest.initial().query.clone();
        Self {
            provider,
            manifest,
            gate: FetchGate::new(),
            state,
            identifier_types: Vec::new(),
        }
    }

    /// Identifier types used to expand ISBN/ISSN searches
    #[must_use]
    pub fn with_identifier_types(mut self, identifier_types: Vec<IdentifierType>) -> Self {
        self.identifier_types = identifier_types;
        self
    }

    /// Current persisted query state
    #[must_use]
    pub const fn state(&self) -> &PersistedQueryState {
        &self.state
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Handle a navigation event
    ///
    /// Returns the requests handed to `runtime`, empty when the gate holds
    /// the fetch back.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` if the segment or search index is unknown.
    pub fn navigate<R: FetchRuntime + ?Sized>(
        &mut self,
        navigation: &Navigation,
        facets: &FacetSnapshot,
        runtime: &mut R,
    ) -> Result<Vec<ResourceRequest>, ManifestError> {
        if !self.gate.should_fetch(navigation, facets) {
            tracing::debug!(key = %navigation.key, "fetch suppressed");
            return Ok(Vec::new());
        }

        let requests = self.build_requests(navigation)?;
        for request in &requests {
            tracing::debug!(resource = %request.resource, path = %request.path, "fetching");
            runtime.fetch(request);
        }
        Ok(requests)
    }

    /// Requests of all gated resources for `navigation`, without consulting the gate
    ///
    /// Updates the persisted state like a real fetch would.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` if the segment or search index is unknown.
    pub fn build_requests(&mut self, navigation: &Navigation) -> Result<Vec<ResourceRequest>, ManifestError> {
        self.requests_where(navigation, |resource| resource.fetch == FetchPolicy::Gated)
    }

    /// Request for an on-demand resource such as an id export
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnknownResource` for undeclared names,
    /// `ManifestError::GatedResource` for resources fetched through the
    /// gate, or a query error.
    pub fn export_request(
        &mut self,
        resource: &str,
        navigation: &Navigation,
    ) -> Result<Option<ResourceRequest>, ManifestError> {
        let definition = self
            .manifest
            .resource(resource)
            .ok_or_else(|| ManifestError::UnknownResource(resource.to_string()))?;
        if definition.fetch == FetchPolicy::Gated {
            return Err(ManifestError::GatedResource(resource.to_string()));
        }

        Ok(self
            .requests_where(navigation, |candidate| candidate.name == resource)?
            .into_iter()
            .next())
    }

    fn requests_where(
        &mut self,
        navigation: &Navigation,
        include: impl Fn(&ResourceDefinition) -> bool,
    ) -> Result<Vec<ResourceRequest>, ManifestError> {
        let request = navigation.request();
        let config = self.provider.index_config(request.segment_name())?;
        let (state, normalized) = normalize(&self.state, &request, config, &self.identifier_types)?;

        let context = RequestContext {
            request: &request,
            navigation,
            config,
            normalized: &normalized,
            state: &state,
            preceding_records_count: self.manifest.preceding_records_count(),
        };
        let requests = self
            .manifest
            .resources()
            .iter()
            .filter(|resource| include(resource))
            .filter_map(|resource| context.build(resource))
            .collect();

        self.state = state;
        Ok(requests)
    }
}
