use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Canonical persisted book record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    /// System-assigned stable identifier
    pub id: Uuid,
    pub title: String,
    /// Joined author display names; `None` for legacy records
    pub author: Option<String>,
    /// Source-provided date text, passed through verbatim
    pub published_date: Option<String>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub description: String,
    /// Reference to the acquiring user; nullable for anonymous records
    pub owner: Option<String>,
    /// Set once at creation, immutable afterwards
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields a caller supplies when creating a record; `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub description: String,
    pub owner: Option<String>,
}

/// Partial update; absent fields are left untouched. `owner` and
/// `created_at` are deliberately not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.published_date.is_none()
            && self.isbn.is_none()
            && self.cover_url.is_none()
            && self.description.is_none()
    }
}

/// Listing parameters: equality filter, substring search, and ordering
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    /// Exact match on the stored published date text
    pub published_date: Option<String>,
    /// Case-insensitive substring match on title or author
    pub search: Option<String>,
    pub ordering: Ordering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    PublishedDate,
    Title,
}

/// Sort directive; the default is newest-first by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for Ordering {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            descending: true,
        }
    }
}

impl Ordering {
    /// Parse a query-string directive: `published_date` or `title`, with a
    /// leading `-` for descending. Anything else is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let (descending, key) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let key = match key {
            "published_date" => SortKey::PublishedDate,
            "title" => SortKey::Title,
            _ => return None,
        };

        Some(Self { key, descending })
    }
}
