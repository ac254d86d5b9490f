//! Built-in segment definitions for instances, holdings and items

use super::types::{FilterDefinition, IndexConfig, IndexTemplate};
use std::collections::BTreeMap;

pub const INSTANCES: &str = "instances";
pub const HOLDINGS: &str = "holdings";
pub const ITEMS: &str = "items";

const KEYWORD_TEMPLATE: &str = r#"keyword all "%{query.query}" or isbn="%{query.query}" or hrid=="%{query.query}" or id=="%{query.query}""#;
const IDENTIFIER_TYPE_TEMPLATE: &str =
    r#"identifiers =/@value/@identifierTypeId="%{identifierTypeId}" "%{query.query}""#;
const RAW_TEMPLATE: &str = "%{query.query}";

/// Indexes shared by every segment
fn common_indexes() -> Vec<IndexTemplate> {
    vec![
        IndexTemplate::new("all", "Keyword (title, contributor, identifier, HRID, UUID)", KEYWORD_TEMPLATE),
        IndexTemplate::new("isbn", "ISBN", IDENTIFIER_TYPE_TEMPLATE),
        IndexTemplate::new("issn", "ISSN", IDENTIFIER_TYPE_TEMPLATE),
        IndexTemplate::new("querySearch", "Query search", RAW_TEMPLATE),
    ]
}

fn common_sort_map() -> BTreeMap<String, String> {
    [
        ("title", "title"),
        ("contributors", "contributors"),
        ("date", "metadata.updatedDate"),
        ("relevance", "relevance"),
    ]
    .into_iter()
    .map(|(key, field)| (key.to_string(), field.to_string()))
    .collect()
}

fn common_filters() -> Vec<FilterDefinition> {
    vec![
        FilterDefinition::new("effectiveLocation", "items.effectiveLocationId", "=="),
        FilterDefinition::new("language", "languages", "=="),
        FilterDefinition::new("resource", "instanceTypeId", "=="),
        FilterDefinition::new("format", "instanceFormatIds", "=="),
        FilterDefinition::new("mode", "modeOfIssuanceId", "=="),
        FilterDefinition::new("natureOfContent", "natureOfContentTermIds", "=="),
        FilterDefinition::new("source", "source", "=="),
        FilterDefinition::new("tags", "tags.tagList", "=="),
        FilterDefinition::new("staffSuppress", "staffSuppress", "==")
            .with_value("true", "true")
            .with_value("false", "false"),
        FilterDefinition::new("discoverySuppress", "discoverySuppress", "==")
            .with_value("true", "true")
            .with_value("false", "false"),
    ]
}

/// Bibliographic records, including the browse variants
#[must_use]
pub fn instances() -> IndexConfig {
    let mut indexes = common_indexes();
    indexes.extend([
        IndexTemplate::new("title", "Title (all)", r#"title all "%{query.query}""#),
        IndexTemplate::new("contributor", "Contributor", r#"contributors.name="%{query.query}""#),
        IndexTemplate::new("identifier", "Identifier (all)", r#"identifiers.value="%{query.query}" or isbn="%{query.query}""#),
        IndexTemplate::new("subject", "Subject", r#"subjects="%{query.query}""#),
        IndexTemplate::new("callNumber", "Effective call number (item), shelving order", r#"itemEffectiveShelvingOrder="%{query.query}""#),
        IndexTemplate::new("hrid", "Instance HRID", r#"hrid=="%{query.query}""#),
        IndexTemplate::new("uuid", "Instance UUID", r#"id=="%{query.query}""#),
        IndexTemplate::new("callNumberBrowse", "Browse call numbers", RAW_TEMPLATE),
        IndexTemplate::new("subjectBrowse", "Browse subjects", RAW_TEMPLATE),
        IndexTemplate::new("contributorBrowse", "Browse contributors", RAW_TEMPLATE),
    ]);

    IndexConfig {
        indexes,
        sort_map: common_sort_map(),
        filters: common_filters(),
    }
}

#[must_use]
pub fn holdings() -> IndexConfig {
    let mut indexes = common_indexes();
    indexes.extend([
        IndexTemplate::new("holdingsHrid", "Holdings HRID", r#"holdings.hrid=="%{query.query}""#),
        IndexTemplate::new("callNumberStandard", "Call number, eye readable", r#"holdingsFullCallNumbers="%{query.query}""#),
        IndexTemplate::new("uuid", "Holdings UUID", r#"holdings.id=="%{query.query}""#),
    ]);

    let mut filters = common_filters();
    filters.push(FilterDefinition::new("holdingsPermanentLocation", "holdings.permanentLocationId", "=="));

    IndexConfig {
        indexes,
        sort_map: common_sort_map(),
        filters,
    }
}

#[must_use]
pub fn items() -> IndexConfig {
    let mut indexes = common_indexes();
    indexes.extend([
        IndexTemplate::new("barcode", "Barcode", r#"items.barcode=="%{query.query}""#),
        IndexTemplate::new("itemHrid", "Item HRID", r#"items.hrid=="%{query.query}""#),
        IndexTemplate::new("itemEffectiveCallNumber", "Effective call number (item), eye readable", r#"itemFullCallNumbers="%{query.query}""#),
        IndexTemplate::new("uuid", "Item UUID", r#"item.id=="%{query.query}""#),
    ]);

    let mut filters = common_filters();
    filters.push(
        FilterDefinition::new("itemStatus", "items.status.name", "==")
            .with_value("available", "Available")
            .with_value("checkedOut", "Checked out"),
    );

    IndexConfig {
        indexes,
        sort_map: common_sort_map(),
        filters,
    }
}
