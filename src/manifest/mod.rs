//! Resource manifest for the search and browse views
//!
//! Declares each named resource the fetch runtime knows about: its path,
//! paging shape and the functions that supply per-request parameters.
//! [`SearchSession`] plugs the query pipeline and the fetch gate into it.

pub mod error;
pub mod resource;
pub mod session;

pub use error::ManifestError;
pub use resource::{
    DynamicParams, FetchPolicy, Pagination, RecordsKey, ResourceDefinition, ResourcePath, ResourceRequest,
    ResourceShape, ResultDensity, highlight_match, preceding_records_count,
};
pub use session::{FetchRuntime, SearchSession};

use crate::config::Settings;
use crate::query::{PersistedQueryState, SearchRequest};
use resource::{RESULT_OFFSET_PLACEHOLDER, browse_path, records_key, search_path};
use serde::Serialize;

pub const RECORDS: &str = "records";
pub const BROWSE_MODE_RECORDS: &str = "browseModeRecords";
pub const RECORDS_TO_EXPORT_IDS: &str = "recordsToExportIDs";
pub const HOLDINGS_TO_EXPORT_IDS: &str = "holdingsToExportIDs";

/// Initial values of the local (non-fetched) resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialValues {
    pub query: PersistedQueryState,
    pub result_count: u32,
    pub result_offset: u64,
}

/// All resources of a search view
#[derive(Debug, Clone)]
pub struct Manifest {
    initial: InitialValues,
    resources: Vec<ResourceDefinition>,
    preceding_records_count: u32,
}

/// Serializable description of a manifest
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestShape {
    pub initial: InitialValues,
    pub resources: Vec<ResourceShape>,
}

impl Manifest {
    /// Build the manifest from settings
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let pagination = Pagination {
            per_request: settings.per_request,
            result_offset: RESULT_OFFSET_PLACEHOLDER,
            result_density: Some(ResultDensity::Sparse),
        };
        let search_params = DynamicParams {
            query: true,
            highlight_match: true,
            preceding_records_count: true,
        };
        let export_params = DynamicParams {
            query: true,
            ..DynamicParams::default()
        };

        let records = |name: &'static str, path: fn(&SearchRequest) -> Option<&'static str>| ResourceDefinition {
            name,
            path: ResourcePath::PerRequest(path),
            records: RecordsKey::PerRequest(records_key),
            pagination: Some(pagination),
            accumulate: true,
            fetch: FetchPolicy::Gated,
            throw_errors: false,
            params: search_params,
            static_fallback: false,
        };
        let export = |name: &'static str, path: &'static str| ResourceDefinition {
            name,
            path: ResourcePath::Static(path),
            records: RecordsKey::Static("ids"),
            pagination: None,
            accumulate: true,
            fetch: FetchPolicy::Never,
            throw_errors: false,
            params: export_params,
            static_fallback: true,
        };

        Self {
            initial: InitialValues {
                query: PersistedQueryState::default(),
                result_count: settings.initial_result_count,
                result_offset: 0,
            },
            resources: vec![
                records(RECORDS, search_path),
                records(BROWSE_MODE_RECORDS, browse_path),
                export(RECORDS_TO_EXPORT_IDS, "search/instances/ids"),
                export(HOLDINGS_TO_EXPORT_IDS, "search/holdings/ids"),
            ],
            preceding_records_count: settings.preceding_records_count,
        }
    }

    #[must_use]
    pub const fn initial(&self) -> &InitialValues {
        &self.initial
    }

    #[must_use]
    pub fn resources(&self) -> &[ResourceDefinition] {
        &self.resources
    }

    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    #[must_use]
    pub const fn preceding_records_count(&self) -> u32 {
        self.preceding_records_count
    }

    #[must_use]
    pub fn shape(&self) -> ManifestShape {
        ManifestShape {
            initial: self.initial.clone(),
            resources: self.resources.iter().map(ResourceDefinition::shape).collect(),
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_resources() {
        let manifest = Manifest::default();
        let names: Vec<_> = manifest.resources().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![RECORDS, BROWSE_MODE_RECORDS, RECORDS_TO_EXPORT_IDS, HOLDINGS_TO_EXPORT_IDS]
        );
        assert_eq!(manifest.initial().result_count, 100);
        assert_eq!(manifest.initial().result_offset, 0);
        assert_eq!(manifest.initial().query, PersistedQueryState::default());
    }

    #[test]
    fn test_records_shape() {
        let manifest = Manifest::default();
        let records = manifest.resource(RECORDS).unwrap();
        let pagination = records.pagination.unwrap();
        assert_eq!(pagination.per_request, 100);
        assert_eq!(pagination.result_offset, "%{resultOffset}");
        assert_eq!(pagination.result_density, Some(ResultDensity::Sparse));
        assert!(records.accumulate);
        assert!(!records.throw_errors);
        assert_eq!(records.fetch, FetchPolicy::Gated);
    }

    #[test]
    fn test_exports_are_never_auto_fetched() {
        let manifest = Manifest::default();
        for name in [RECORDS_TO_EXPORT_IDS, HOLDINGS_TO_EXPORT_IDS] {
            let resource = manifest.resource(name).unwrap();
            assert_eq!(resource.fetch, FetchPolicy::Never);
            assert!(resource.params.query);
            assert!(!resource.params.highlight_match);
        }
    }

    #[test]
    fn test_settings_flow_into_manifest() {
        let settings = Settings {
            per_request: 25,
            preceding_records_count: 7,
            initial_result_count: 10,
            ..Default::default()
        };
        let manifest = Manifest::new(&settings);
        assert_eq!(manifest.resource(BROWSE_MODE_RECORDS).unwrap().pagination.unwrap().per_request, 25);
        assert_eq!(manifest.preceding_records_count(), 7);
        assert_eq!(manifest.initial().result_count, 10);
    }

    #[test]
    fn test_shape_serializes() {
        let json = serde_json::to_value(Manifest::default().shape()).unwrap();
        assert_eq!(json["resources"][0]["name"], "records");
        assert_eq!(json["resources"][0]["path"], "<per request>");
        assert_eq!(json["resources"][2]["path"], "search/instances/ids");
        assert_eq!(json["initial"]["resultCount"], 100);
    }
}
