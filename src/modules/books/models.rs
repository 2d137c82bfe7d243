use serde::{Deserialize, Serialize};

/// Canonical metadata produced by the normalizer for a single edition.
/// Transient: either returned to the caller as-is or converted into a
/// stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    pub title: String,
    /// Joined author display names, or `"Unknown"`
    pub author: Option<String>,
    /// Upstream date text, passed through verbatim
    pub published_date: Option<String>,
    pub description: String,
    pub cover_url: Option<String>,
    /// Attached by the orchestrator on the save path, never parsed back
    /// out of the edition response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

/// One entry of an open search, not persisted until explicitly saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    /// Comma-joined author list, or `"Unknown"`
    pub author: String,
    /// First publication year as text, or the literal `"Unknown"`
    pub published_year: String,
    /// First of possibly many upstream ISBNs
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
}

/// Query parameters for `GET /fetch-book`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchBookParams {
    pub isbn: Option<String>,
}

/// Body for `POST /fetch-and-save`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchAndSaveRequest {
    pub isbn: Option<String>,
}

/// Query parameters for `GET /search-open`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOpenParams {
    pub title: Option<String>,
}

/// Body for `POST /save-from-search`: a search result the user picked,
/// echoed back for persistence
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveFromSearchRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_date: Option<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

/// Body for `POST /` (manual create)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

/// Body for `PATCH /{id}`; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for the library listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBooksParams {
    /// Exact match on the stored published date text
    pub published_date: Option<String>,
    /// Substring match on title or author
    pub search: Option<String>,
    /// `published_date` or `title`, `-` prefix for descending
    pub ordering: Option<String>,
}
