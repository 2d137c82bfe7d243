//! External catalog lookups and normalization.
//!
//! The client trait is the seam for test doubles; the reqwest-backed
//! implementation lives in [`open_library`]. Normalization is pure and kept
//! apart from I/O in [`normalize`].

pub mod normalize;
pub mod open_library;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use atheneum_http::error::AppError;

pub use open_library::OpenLibraryClient;
pub use types::{AuthorRef, RawAuthor, RawEdition, RawSearchDoc, RawSearchResponse, RawText};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no catalog record for ISBN {isbn}")]
    NotFound { isbn: String },

    #[error("catalog request failed: {message}")]
    Transport { message: String },

    #[error("catalog returned status {status}")]
    UpstreamStatus { status: u16 },
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { isbn } => {
                AppError::not_found(format!("Book not found or invalid ISBN: {isbn}"))
            }
            CatalogError::Transport { message } => {
                tracing::warn!(error = %message, "catalog transport failure");
                AppError::upstream("Failed to fetch from Open Library")
            }
            CatalogError::UpstreamStatus { status } => {
                tracing::warn!(status, "catalog returned unexpected status");
                AppError::upstream("Failed to fetch from Open Library")
            }
        }
    }
}

/// Outbound catalog operations; implemented by [`OpenLibraryClient`] and by
/// test doubles
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Look up a single edition by ISBN. A client-error status from the
    /// upstream means the ISBN is unknown.
    async fn edition_by_isbn(&self, isbn: &str) -> Result<RawEdition, CatalogError>;

    /// Resolve one author reference. Failures of any kind are expected and
    /// tolerated, so this returns `None` instead of an error.
    async fn author_by_key(&self, key: &str) -> Option<RawAuthor>;

    /// Title search; an empty doc list is a valid success.
    async fn search_by_title(&self, title: &str) -> Result<RawSearchResponse, CatalogError>;
}

/// Resolve author references to display names, preserving input order.
///
/// Failed lookups and resolved authors without a display name contribute
/// nothing; the result is at most as long as the input. The enclosing
/// record fetch succeeds even if every lookup here fails.
pub async fn resolve_authors(client: &dyn CatalogClient, refs: &[AuthorRef]) -> Vec<String> {
    let mut names = Vec::with_capacity(refs.len());

    for author_ref in refs {
        let Some(key) = author_ref.key.as_deref().filter(|key| !key.is_empty()) else {
            debug!("skipping author reference without a key");
            continue;
        };

        match client.author_by_key(key).await {
            Some(author) => match author.name.filter(|name| !name.is_empty()) {
                Some(name) => names.push(name),
                None => debug!(key, "author record has no display name, skipping"),
            },
            None => debug!(key, "author lookup failed, skipping"),
        }
    }

    names
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::testing::MockCatalog;
    use super::*;

    fn author_ref(key: &str) -> AuthorRef {
        AuthorRef {
            key: Some(key.to_string()),
        }
    }

    fn named_author(name: &str) -> RawAuthor {
        RawAuthor {
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn resolves_authors_in_input_order() {
        let client = MockCatalog {
            authors: HashMap::from([
                ("/authors/OL1A".to_string(), named_author("Terry Pratchett")),
                ("/authors/OL2A".to_string(), named_author("Neil Gaiman")),
            ]),
            ..Default::default()
        };

        let refs = [author_ref("/authors/OL1A"), author_ref("/authors/OL2A")];
        let names = resolve_authors(&client, &refs).await;
        assert_eq!(names, vec!["Terry Pratchett", "Neil Gaiman"]);
    }

    #[tokio::test]
    async fn failed_lookups_are_dropped_without_failing() {
        let client = MockCatalog {
            authors: HashMap::from([("/authors/OL2A".to_string(), named_author("Neil Gaiman"))]),
            ..Default::default()
        };

        let refs = [
            author_ref("/authors/OL1A"),
            author_ref("/authors/OL2A"),
            AuthorRef { key: None },
        ];
        let names = resolve_authors(&client, &refs).await;
        assert_eq!(names, vec!["Neil Gaiman"]);
    }

    #[tokio::test]
    async fn author_without_display_name_is_skipped() {
        let client = MockCatalog {
            authors: HashMap::from([
                ("/authors/OL1A".to_string(), RawAuthor { name: None }),
                ("/authors/OL2A".to_string(), named_author("Neil Gaiman")),
            ]),
            ..Default::default()
        };

        let refs = [author_ref("/authors/OL1A"), author_ref("/authors/OL2A")];
        let names = resolve_authors(&client, &refs).await;
        assert_eq!(names, vec!["Neil Gaiman"]);
    }

    #[tokio::test]
    async fn all_failures_yield_empty_list() {
        let client = MockCatalog::default();
        let refs = [author_ref("/authors/OL1A")];
        assert!(resolve_authors(&client, &refs).await.is_empty());
    }
}
