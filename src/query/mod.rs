//! Query construction from search and browse form state
//!
//! The pipeline for one navigation:
//! 1. [`SearchRequest`] is parsed from the URL query string
//! 2. [`normalize`] syncs the [`PersistedQueryState`], settles the sort and
//!    resolves the CQL fragment through [`TemplateResolver`]
//! 3. [`QueryComposer`] fills the fragment and appends filters and sort

pub mod compose;
pub mod error;
pub mod identifiers;
pub mod mode;
pub mod normalize;
pub mod request;
pub mod template;

pub use compose::{CQL_FIND_ALL, FailPolicy, QueryComposer};
pub use error::QueryError;
pub use identifiers::IdentifierType;
pub use mode::{BrowseKind, IdentifierKind, LookupKind, SearchMode, is_field_comparison};
pub use normalize::{BROWSE_MATCH_ALL, NormalizedQuery, normalize};
pub use request::{DEFAULT_INDEX, DEFAULT_SORT, PersistedQueryState, SearchRequest, UrlParams};
pub use template::{Resolution, TemplateResolver, range_clause};
