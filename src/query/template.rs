//! Query template resolution
//!
//! Turns a search index plus the user's input into a CQL fragment. The
//! fragment may still contain `%{query.<field>}` placeholders; those are
//! filled in by [`compose`](super::compose).

use super::error::QueryError;
use super::identifiers::{IdentifierType, expand_identifier_template};
use super::mode::{LookupKind, SearchMode, has_sort_directive, is_field_comparison, strip_quotes};
use super::request::non_empty;
use crate::segments::IndexConfig;

/// Output of template resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub mode: SearchMode,

    /// CQL fragment, never empty
    pub fragment: String,

    /// The persisted `selectedBrowseResult` flag must be cleared
    pub reset_selected_browse_result: bool,
}

/// Two-sided range clause anchored at `value`
///
/// Values that already are relational expressions on a browse field are
/// returned unchanged.
#[must_use]
pub fn range_clause(field: &str, value: &str) -> String {
    if is_field_comparison(value) {
        return value.to_string();
    }
    let value = strip_quotes(value);
    format!(r#"{field}>="{value}" or {field}<"{value}""#)
}

/// Resolves search indexes against one segment's configuration
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    config: &'a IndexConfig,
    identifier_types: &'a [IdentifierType],
}

impl<'a> TemplateResolver<'a> {
    #[must_use]
    pub const fn new(config: &'a IndexConfig, identifier_types: &'a [IdentifierType]) -> Self {
        Self {
            config,
            identifier_types,
        }
    }

    /// Resolve `search_index` and the input into a CQL fragment
    ///
    /// `browse_point` takes precedence over `raw_text` for browse modes.
    /// Exact lookups always use `raw_text`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownIndex` if `search_index` is not registered.
    pub fn resolve(
        &self,
        search_index: &str,
        raw_text: &str,
        browse_point: Option<&str>,
        selected_browse_result: bool,
    ) -> Result<Resolution, QueryError> {
        let template = &self
            .config
            .index(search_index)
            .ok_or_else(|| QueryError::UnknownIndex(search_index.to_string()))?
            .template;

        let mode = SearchMode::from_index(search_index);
        let value = non_empty(browse_point).unwrap_or(raw_text);
        let mut reset_selected_browse_result = false;

        let fragment = match &mode {
            SearchMode::IdentifierLookup(kind) => {
                expand_identifier_template(template, self.identifier_types, *kind)
            }
            SearchMode::RangeBrowse(kind) => range_clause(kind.field(), value),
            SearchMode::ExactLookup(LookupKind::Contributor) => {
                if selected_browse_result {
                    reset_selected_browse_result = true;
                    LookupKind::Contributor.exact_clause(raw_text)
                } else {
                    template.clone()
                }
            }
            SearchMode::ExactLookup(kind) => kind.exact_clause(raw_text),
            SearchMode::RawQueryLanguage if has_sort_directive(raw_text) => raw_text.to_string(),
            SearchMode::RawQueryLanguage | SearchMode::FreeText(_) => template.clone(),
        };

        tracing::debug!(index = search_index, %mode, fragment = %fragment, "resolved query template");

        Ok(Resolution {
            mode,
            fragment,
            reset_selected_browse_result,
        })
    }
}
