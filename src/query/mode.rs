//! Search modes selected by the `qindex` parameter
//!
//! Each index name maps onto exactly one mode. Modes carry the data their
//! query builder needs, so dispatch is a `match` rather than a chain of
//! string comparisons.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Index name for raw CQL passthrough
pub const QUERY_SEARCH_INDEX: &str = "querySearch";

/// A value that is already a relational expression on a browse field
static FIELD_COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(callNumber|subject|name|itemEffectiveShelvingOrder)\s*[<>]")
        .expect("field comparison pattern is valid")
});

/// A `sortby` directive inside raw CQL
static SORT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsortby\b").expect("sort directive pattern is valid"));

/// Whether `value` already is a `field < ...` / `field > ...` expression
#[must_use]
pub fn is_field_comparison(value: &str) -> bool {
    FIELD_COMPARISON.is_match(value)
}

/// Whether raw CQL carries its own `sortby` clause
#[must_use]
pub fn has_sort_directive(value: &str) -> bool {
    SORT_DIRECTIVE.is_match(value)
}

/// Remove every double quote so the value can sit inside a quoted term
#[must_use]
pub fn strip_quotes(value: &str) -> String {
    value.replace('"', "")
}

/// Browse variants, each backed by its own endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BrowseKind {
    CallNumbers,
    Subjects,
    Contributors,
}

impl BrowseKind {
    pub const ALL: [Self; 3] = [Self::CallNumbers, Self::Subjects, Self::Contributors];

    #[must_use]
    pub const fn index_name(self) -> &'static str {
        match self {
            Self::CallNumbers => "callNumberBrowse",
            Self::Subjects => "subjectBrowse",
            Self::Contributors => "contributorBrowse",
        }
    }

    /// Field the range clause compares against
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::CallNumbers => "callNumber",
            Self::Subjects => "subject",
            Self::Contributors => "name",
        }
    }

    /// Backend path serving this browse
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::CallNumbers => "browse/call-numbers/instances",
            Self::Subjects => "browse/subjects/instances",
            Self::Contributors => "browse/contributors/instances",
        }
    }

    #[must_use]
    pub fn from_index(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.index_name() == name)
    }
}

/// Exact-match lookups reached from a browse result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LookupKind {
    Subject,
    CallNumber,
    Contributor,
}

impl LookupKind {
    #[must_use]
    pub const fn index_name(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::CallNumber => "callNumber",
            Self::Contributor => "contributor",
        }
    }

    /// Exact string-match clause for `value`, with double quotes removed
    #[must_use]
    pub fn exact_clause(self, value: &str) -> String {
        let value = strip_quotes(value);
        match self {
            Self::Subject => format!(r#"subjects==/string "{value}""#),
            Self::CallNumber => format!(r#"itemEffectiveShelvingOrder==/string "{value}""#),
            Self::Contributor => format!(r#"contributors.name ==/string "{value}""#),
        }
    }

    #[must_use]
    pub fn from_index(name: &str) -> Option<Self> {
        [Self::Subject, Self::CallNumber, Self::Contributor]
            .into_iter()
            .find(|kind| kind.index_name() == name)
    }
}

/// Identifier families expanded through identifier-type records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IdentifierKind {
    Isbn,
    Issn,
}

impl IdentifierKind {
    /// Lower-case marker matched against index and identifier-type names
    #[must_use]
    pub const fn family(self) -> &'static str {
        match self {
            Self::Isbn => "isbn",
            Self::Issn => "issn",
        }
    }

    #[must_use]
    pub fn from_index(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.contains("isbn") {
            Some(Self::Isbn)
        } else if lower.contains("issn") {
            Some(Self::Issn)
        } else {
            None
        }
    }
}

/// How a search index turns input text into CQL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SearchMode {
    /// Registered template with the query substituted in
    FreeText(String),
    RangeBrowse(BrowseKind),
    ExactLookup(LookupKind),
    IdentifierLookup(IdentifierKind),
    RawQueryLanguage,
}

impl SearchMode {
    /// Classify an index name
    ///
    /// Never fails: unknown names are free-text indexes, validated later
    /// against the segment configuration.
    #[must_use]
    pub fn from_index(name: &str) -> Self {
        if name == QUERY_SEARCH_INDEX {
            Self::RawQueryLanguage
        } else if let Some(kind) = BrowseKind::from_index(name) {
            Self::RangeBrowse(kind)
        } else if let Some(kind) = LookupKind::from_index(name) {
            Self::ExactLookup(kind)
        } else if let Some(kind) = IdentifierKind::from_index(name) {
            Self::IdentifierLookup(kind)
        } else {
            Self::FreeText(name.to_string())
        }
    }

    #[must_use]
    pub const fn is_browse(&self) -> bool {
        matches!(self, Self::RangeBrowse(_))
    }

    #[must_use]
    pub const fn browse_kind(&self) -> Option<BrowseKind> {
        match self {
            Self::RangeBrowse(kind) => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::RawQueryLanguage)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeText(index) => write!(f, "free text ({index})"),
            Self::RangeBrowse(kind) => write!(f, "browse ({})", kind.index_name()),
            Self::ExactLookup(kind) => write!(f, "exact lookup ({})", kind.index_name()),
            Self::IdentifierLookup(kind) => write!(f, "identifier lookup ({})", kind.family()),
            Self::RawQueryLanguage => f.write_str("raw query"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_mode_classification() {
        assert_eq!(SearchMode::from_index("querySearch"), SearchMode::RawQueryLanguage);
        assert_eq!(
            SearchMode::from_index("callNumberBrowse"),
            SearchMode::RangeBrowse(BrowseKind::CallNumbers)
        );
        assert_eq!(
            SearchMode::from_index("contributor"),
            SearchMode::ExactLookup(LookupKind::Contributor)
        );
        assert_eq!(
            SearchMode::from_index("isbn"),
            SearchMode::IdentifierLookup(IdentifierKind::Isbn)
        );
        assert_eq!(
            SearchMode::from_index("invalidIssn"),
            SearchMode::IdentifierLookup(IdentifierKind::Issn)
        );
        assert_eq!(SearchMode::from_index("title"), SearchMode::FreeText("title".to_string()));
    }

    #[test]
    fn test_field_comparison_pattern() {
        assert!(is_field_comparison("callNumber > X"));
        assert!(is_field_comparison("callNumber>X"));
        assert!(is_field_comparison("SUBJECT < \"foo\""));
        assert!(is_field_comparison("name >= \"Twain\""));
        assert!(is_field_comparison("itemEffectiveShelvingOrder < A"));
        assert!(!is_field_comparison("title > X"));
        assert!(!is_field_comparison("A 123"));
        assert!(!is_field_comparison("x callNumber > X"));
        assert!(!is_field_comparison("callNumber | X"));
    }

    #[test]
    fn test_sort_directive_detection() {
        assert!(has_sort_directive("title=cat sortby title"));
        assert!(has_sort_directive("title=cat SORTBY title/sort.descending"));
        assert!(!has_sort_directive("title=sortbyname"));
        assert!(!has_sort_directive("title=cat"));
    }

    #[test]
    fn test_browse_paths_are_distinct() {
        let paths: BTreeSet<_> = BrowseKind::ALL.iter().map(|k| k.path()).collect();
        assert_eq!(paths.len(), 3);
    }
}
