//! Identifier-type expansion for ISBN/ISSN searches

use super::mode::IdentifierKind;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by an identifier type id
pub const IDENTIFIER_TYPE_PLACEHOLDER: &str = "%{identifierTypeId}";

/// Substituted when no identifier type of the family exists
pub const IDENTIFIER_TYPE_NOT_FOUND: &str = "identifier-type-not-found";

/// An identifier type record (`ISBN`, `Invalid ISBN`, `ISSN`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierType {
    pub id: String,
    pub name: String,
}

impl IdentifierType {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Expand `template` into one clause per identifier type of the family
///
/// Clauses are OR-ed and parenthesised when there is more than one.
#[must_use]
pub fn expand_identifier_template(template: &str, types: &[IdentifierType], kind: IdentifierKind) -> String {
    let clauses: Vec<String> = types
        .iter()
        .filter(|t| t.name.to_lowercase().contains(kind.family()))
        .map(|t| template.replace(IDENTIFIER_TYPE_PLACEHOLDER, &t.id))
        .collect();

    match clauses.len() {
        0 => {
            tracing::warn!(family = kind.family(), "no identifier type matches, search will be empty");
            template.replace(IDENTIFIER_TYPE_PLACEHOLDER, IDENTIFIER_TYPE_NOT_FOUND)
        }
        1 => clauses.into_iter().next().unwrap_or_default(),
        _ => format!("({})", clauses.join(" or ")),
    }
}
