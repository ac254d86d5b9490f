//! Integration tests for the navigation pipeline
//!
//! Each test drives a `SearchSession` the way a search view would: one
//! navigation at a time, with a runtime that records what would be fetched.

use cqlnav::config::Settings;
use cqlnav::gate::{FacetSnapshot, FetchGate, Navigation};
use cqlnav::manifest::{
    BROWSE_MODE_RECORDS, FetchRuntime, HOLDINGS_TO_EXPORT_IDS, Manifest, RECORDS, ResourceRequest, SearchSession,
};
use cqlnav::query::{DEFAULT_SORT, IdentifierType, PersistedQueryState, SearchRequest, TemplateResolver, normalize};
use cqlnav::segments::{IndexConfigProvider, SegmentRegistry, builtin};
use std::fs;

#[derive(Default)]
struct Recorder {
    requests: Vec<ResourceRequest>,
}

impl FetchRuntime for Recorder {
    fn fetch(&mut self, request: &ResourceRequest) {
        self.requests.push(request.clone());
    }
}

fn session() -> SearchSession<SegmentRegistry> {
    SearchSession::new(SegmentRegistry::builtin(), Manifest::default())
}

fn navigate(session: &mut SearchSession<SegmentRegistry>, key: &str, search: &str) -> Vec<ResourceRequest> {
    let mut recorder = Recorder::default();
    session
        .navigate(&Navigation::new(key, search, 0), &FacetSnapshot::empty(), &mut recorder)
        .unwrap()
}

#[test]
fn test_search_indexes_default_to_title_sort() {
    let config = builtin::instances();
    for index in ["all", "title", "contributor", "subject", "callNumber", "identifier", "hrid"] {
        let request = SearchRequest::from_query_string(&format!("qindex={index}&query=x"));
        let (state, _) = normalize(&PersistedQueryState::default(), &request, &config, &[]).unwrap();
        assert_eq!(state.sort, DEFAULT_SORT, "index {index}");
    }
}

#[test]
fn test_browse_indexes_never_sort() {
    let mut session = session();
    for (key, index) in ["callNumberBrowse", "subjectBrowse", "contributorBrowse"].iter().enumerate() {
        let requests = navigate(&mut session, &key.to_string(), &format!("qindex={index}&query=q{key}&sort=title"));
        assert_eq!(session.state().sort, "", "index {index}");
        assert!(!requests[0].query.as_deref().unwrap().contains("sortby"));
    }
}

#[test]
fn test_call_number_browse_queries() {
    let config = builtin::instances();
    let resolver = TemplateResolver::new(&config, &[]);
    assert_eq!(
        resolver.resolve("callNumberBrowse", "A 123", None, false).unwrap().fragment,
        r#"callNumber>="A 123" or callNumber<"A 123""#
    );
    assert_eq!(
        resolver.resolve("callNumberBrowse", "callNumber > X", None, false).unwrap().fragment,
        "callNumber > X"
    );
}

#[test]
fn test_browse_quotes_are_stripped() {
    let config = builtin::instances();
    let resolver = TemplateResolver::new(&config, &[]);
    let quoted = resolver.resolve("subjectBrowse", r#""History""#, None, false).unwrap();
    let plain = resolver.resolve("subjectBrowse", "History", None, false).unwrap();
    assert_eq!(quoted.fragment, plain.fragment);
}

#[test]
fn test_browse_point_wins_over_query_text() {
    let mut session = session();
    let requests = navigate(&mut session, "1", "qindex=callNumberBrowse&query=A&browsePoint=B%201");
    assert_eq!(requests[0].resource, BROWSE_MODE_RECORDS);
    assert_eq!(requests[0].query.as_deref(), Some(r#"callNumber>="B 1" or callNumber<"B 1""#));
}

#[test]
fn test_gate_memoizes_same_navigation() {
    let mut session = session();
    let mut recorder = Recorder::default();
    let nav = Navigation::new("k1", "qindex=title&query=dune", 0);

    let first = session.navigate(&nav, &FacetSnapshot::empty(), &mut recorder).unwrap();
    let second = session.navigate(&nav, &FacetSnapshot::empty(), &mut recorder).unwrap();

    // the memo repeats the cached "fetch" answer without re-deciding; the
    // runtime, not the gate, drops duplicate in-flight requests
    assert_eq!(first, second);
    assert_eq!(recorder.requests.len(), 2);
}

#[test]
fn test_index_switch_rules() {
    let mut gate = FetchGate::new();
    let empty = FacetSnapshot::empty();

    assert!(gate.should_fetch(&Navigation::new("1", "qindex=title&query=cat", 0), &empty));
    // switch without query change waits
    assert!(!gate.should_fetch(&Navigation::new("2", "qindex=subject&query=cat", 0), &empty));
    // switch with query change fetches
    assert!(gate.should_fetch(&Navigation::new("3", "qindex=title&query=dog", 0), &empty));
    // switch with a selected browse result fetches
    assert!(gate.should_fetch(
        &Navigation::new("4", "qindex=contributor&query=dog&selectedBrowseResult=true", 0),
        &empty
    ));
    // switching to a cleared form is a reset
    assert!(gate.should_fetch(&Navigation::new("5", "", 0), &empty));
}

#[test]
fn test_reset_with_pending_facets_waits() {
    let mut gate = FetchGate::new();
    assert!(gate.should_fetch(&Navigation::new("1", "qindex=title", 0), &FacetSnapshot::empty()));
    assert!(!gate.should_fetch(
        &Navigation::new("2", "", 0),
        &FacetSnapshot::empty().with_selection("language", "eng")
    ));
}

#[test]
fn test_contributor_browse_selection_round_trip() {
    let mut session = session();

    let requests = navigate(&mut session, "1", "qindex=contributorBrowse&query=Twain");
    assert_eq!(requests[0].path, "browse/contributors/instances");
    assert_eq!(requests[0].query.as_deref(), Some(r#"name>="Twain" or name<"Twain""#));

    // picking a browse result switches to an exact contributor search
    let requests = navigate(
        &mut session,
        "2",
        "qindex=contributor&query=Twain%2C%20Mark&selectedBrowseResult=true",
    );
    assert_eq!(requests[0].resource, RECORDS);
    assert_eq!(
        requests[0].query.as_deref(),
        Some(r#"contributors.name ==/string "Twain, Mark" sortby title"#)
    );
    assert!(!session.state().selected_browse_result);

    // refining the search later uses the plain contributor template
    let requests = navigate(&mut session, "3", "qindex=contributor&query=Twain");
    assert_eq!(
        requests[0].query.as_deref(),
        Some(r#"contributors.name="Twain" sortby title"#)
    );
}

#[test]
fn test_earlier_browse_selection_does_not_leak_into_contributor_search() {
    let mut session = session();

    let requests = navigate(&mut session, "1", "qindex=subject&query=Cats&selectedBrowseResult=true");
    assert_eq!(requests[0].query.as_deref(), Some(r#"subjects==/string "Cats" sortby title"#));

    let requests = navigate(&mut session, "2", "qindex=contributor&query=Twain");
    assert_eq!(
        requests[0].query.as_deref(),
        Some(r#"contributors.name="Twain" sortby title"#)
    );
}

#[test]
fn test_exact_lookups_from_browse() {
    let mut session = session();
    let requests = navigate(&mut session, "1", "qindex=subject&query=%22Cats%22");
    assert_eq!(requests[0].query.as_deref(), Some(r#"subjects==/string "Cats" sortby title"#));

    let requests = navigate(&mut session, "2", "qindex=callNumber&query=QA76");
    assert_eq!(
        requests[0].query.as_deref(),
        Some(r#"itemEffectiveShelvingOrder==/string "QA76" sortby title"#)
    );
}

#[test]
fn test_raw_query_passthrough() {
    let mut session = session();
    let requests = navigate(&mut session, "1", "qindex=querySearch&query=title%3D%22a%22%20sortby%20contributors");
    assert_eq!(requests[0].query.as_deref(), Some(r#"title="a" sortby contributors"#));
    assert_eq!(session.state().sort, "");

    let requests = navigate(&mut session, "2", "qindex=querySearch&query=title%3D%22a%22");
    assert_eq!(requests[0].query.as_deref(), Some(r#"title="a" sortby title"#));
}

#[test]
fn test_identifier_search_with_types() {
    let mut session = session().with_identifier_types(vec![
        IdentifierType::new("isbn-1", "ISBN"),
        IdentifierType::new("isbn-2", "Invalid ISBN"),
    ]);
    let requests = navigate(&mut session, "1", "qindex=isbn&query=978");
    assert_eq!(
        requests[0].query.as_deref(),
        Some(concat!(
            r#"(identifiers =/@value/@identifierTypeId="isbn-1" "978""#,
            r#" or identifiers =/@value/@identifierTypeId="isbn-2" "978") sortby title"#
        ))
    );
}

#[test]
fn test_filters_and_descending_sort() {
    let mut session = session();
    let requests = navigate(
        &mut session,
        "1",
        "qindex=title&query=dune&filters=language.eng,language.fre,source.MARC&sort=-title",
    );
    assert_eq!(
        requests[0].query.as_deref(),
        Some(r#"(title all "dune") and languages==("eng" or "fre") and source=="MARC" sortby title/sort.descending"#)
    );
}

#[test]
fn test_browse_with_filters_only() {
    let mut session = session();
    let requests = navigate(&mut session, "1", "qindex=subjectBrowse&filters=language.eng");
    assert_eq!(
        requests[0].query.as_deref(),
        Some(r#"(subject>="undefined" or subject<"undefined") and languages=="eng""#)
    );
    assert_eq!(session.state().query, "undefined");
}

#[test]
fn test_paging_and_preceding_records() {
    let mut session = session();
    let mut recorder = Recorder::default();
    let requests = session
        .navigate(
            &Navigation::new("1", "qindex=title&query=subject%20%3C%20Cats", 200),
            &FacetSnapshot::empty(),
            &mut recorder,
        )
        .unwrap();
    let request = &requests[0];
    assert_eq!(request.offset, 200);
    assert_eq!(request.limit, Some(100));
    assert_eq!(request.records, "items");
    assert_eq!(request.highlight_match, Some(false));
    assert_eq!(request.preceding_records_count, Some(5));
}

#[test]
fn test_holdings_export_on_items_segment() {
    let mut session = session();
    let request = session
        .export_request(
            HOLDINGS_TO_EXPORT_IDS,
            &Navigation::new("1", "segment=items&qindex=all&query=x&filters=itemStatus.checkedOut", 0),
        )
        .unwrap()
        .unwrap();
    assert_eq!(request.path, "search/holdings/ids");
    assert!(request.query.unwrap().contains(r#"items.status.name=="Checked out""#));
}

#[test]
fn test_settings_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let segments = dir.path().join("segments.toml");
    fs::write(
        &segments,
        r#"
[segments.instances]
sort_map = { title = "sortTitle" }

[[segments.instances.indexes]]
name = "title"
template = 'title="%{query.query}"'
"#,
    )
    .unwrap();

    let config_file = dir.path().join("config.toml");
    fs::write(
        &config_file,
        format!("per_request = 20\nsegments_file = {:?}\n", segments.display().to_string()),
    )
    .unwrap();

    let settings = Settings::load_from(&config_file).unwrap();
    let registry = settings.segment_registry().unwrap();
    assert!(!registry.index_config("instances").unwrap().has_index("subject"));

    let mut session = SearchSession::new(registry, Manifest::new(&settings));
    let requests = navigate(&mut session, "1", "qindex=title&query=dune");
    assert_eq!(requests[0].limit, Some(20));
    assert_eq!(requests[0].query.as_deref(), Some(r#"title="dune" sortby sortTitle"#));
}
