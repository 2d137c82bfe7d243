//! Raw response shapes from the upstream catalog.
//!
//! Everything here is deliberately loose: the upstream omits fields freely
//! and the normalizer is where missing data degrades to defaults.

use serde::Deserialize;

/// Unprocessed edition response from a lookup by ISBN
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEdition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub description: Option<RawText>,
}

/// Reference to an author record, e.g. `{ "key": "/authors/OL23919A" }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub key: Option<String>,
}

/// Author record from a secondary lookup; the display name can be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// Free text the upstream serves either as a plain string or wrapped in a
/// `{ "type": ..., "value": ... }` object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Plain(String),
    Wrapped {
        #[serde(default)]
        value: Option<String>,
    },
}

impl RawText {
    /// Unwrap to the carried text; a wrapped object without a value yields
    /// an empty string.
    pub fn into_text(self) -> String {
        match self {
            RawText::Plain(text) => text,
            RawText::Wrapped { value } => value.unwrap_or_default(),
        }
    }
}

/// Unprocessed title-search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub docs: Vec<RawSearchDoc>,
}

/// One matching document of a title search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchDoc {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub first_publish_year: Option<i64>,
    #[serde(default)]
    pub isbn: Option<Vec<String>>,
    #[serde(default)]
    pub cover_edition_key: Option<String>,
    #[serde(default)]
    pub edition_key: Option<Vec<String>>,
}
