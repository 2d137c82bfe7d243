//! Catalog service: the orchestrating facade behind the books routes.
//!
//! Validation happens here, before any network call or write; the client
//! and store arrive as injected traits so tests run against doubles.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use atheneum_authz::Identity;
use atheneum_http::error::AppError;
use atheneum_store::{BookPatch, BookQuery, BookRecord, BookStore, NewBook, Ordering, StoreError};

use crate::utils::title_case;

use super::catalog::{normalize, resolve_authors, CatalogClient};
use super::models::{
    BookMetadata, CreateBookRequest, ListBooksParams, SaveFromSearchRequest, SearchResult,
    UpdateBookRequest,
};

/// Upper bound on surfaced search results; upstream order is preserved
pub const MAX_SEARCH_RESULTS: usize = 15;
/// Longest accepted ISBN text
pub const MAX_ISBN_LEN: usize = 20;

pub struct BookService {
    client: Arc<dyn CatalogClient>,
    store: Arc<dyn BookStore>,
    covers_base: String,
}

impl BookService {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        store: Arc<dyn BookStore>,
        covers_base: String,
    ) -> Self {
        Self {
            client,
            store,
            covers_base,
        }
    }

    /// Read-only lookup: fetch and normalize one edition, no dedup check,
    /// nothing persisted.
    pub async fn fetch_by_isbn(&self, isbn: Option<&str>) -> Result<BookMetadata, AppError> {
        let isbn = required(isbn, "isbn")?;
        self.fetch_normalized(&isbn).await
    }

    /// Fetch one edition and persist it, deduplicating by ISBN.
    pub async fn fetch_and_save(
        &self,
        isbn: Option<&str>,
        owner: Option<String>,
    ) -> Result<BookRecord, AppError> {
        let isbn = required(isbn, "isbn")?;
        check_isbn_length(&isbn)?;

        // Advisory fast-path; the store re-checks inside its insert lock.
        if self.store.exists_by_isbn(&isbn).await.map_err(store_error)? {
            return Err(AppError::conflict(
                vec![],
                "Book with this ISBN already exists.",
            ));
        }

        let mut metadata = self.fetch_normalized(&isbn).await?;
        metadata.isbn = Some(isbn.clone());

        let record = self
            .store
            .insert(sanitized_new_book(metadata, owner)?)
            .await
            .map_err(store_error)?;

        info!(book_id = %record.id, %isbn, "book fetched and saved");
        Ok(record)
    }

    /// Open title search, capped at [`MAX_SEARCH_RESULTS`] entries.
    pub async fn search_by_title(&self, title: Option<&str>) -> Result<Vec<SearchResult>, AppError> {
        let title = required(title, "title")?;
        let response = self.client.search_by_title(&title).await?;

        Ok(response
            .docs
            .iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|doc| normalize::normalize_search_doc(doc, &self.covers_base))
            .collect())
    }

    /// Persist a search result the user picked, deduplicating by ISBN when
    /// one was carried along, else by (title, author).
    pub async fn save_from_search(
        &self,
        request: SaveFromSearchRequest,
        owner: Option<String>,
    ) -> Result<BookRecord, AppError> {
        let title = required(request.title.as_deref(), "title")?;
        let author = required(request.author.as_deref(), "author")?;
        let isbn = trimmed(request.isbn);
        if let Some(isbn) = &isbn {
            check_isbn_length(isbn)?;
        }

        let duplicate = match &isbn {
            Some(isbn) => self.store.exists_by_isbn(isbn).await.map_err(store_error)?,
            None => self
                .store
                .exists_by_title_author(&title, &author)
                .await
                .map_err(store_error)?,
        };
        if duplicate {
            let message = if isbn.is_some() {
                "Book with this ISBN already exists."
            } else {
                "Book with this title and author already exists."
            };
            return Err(AppError::conflict(vec![], message));
        }

        let metadata = BookMetadata {
            title,
            author: Some(author),
            published_date: request.published_date,
            description: request.description.unwrap_or_default(),
            cover_url: request.cover_url,
            isbn,
        };

        self.store
            .insert(sanitized_new_book(metadata, owner)?)
            .await
            .map_err(store_error)
    }

    /// Manual create; dedup-key uniqueness is enforced by the store.
    pub async fn create(
        &self,
        request: CreateBookRequest,
        owner: Option<String>,
    ) -> Result<BookRecord, AppError> {
        let title = required(request.title.as_deref(), "title")?;
        let isbn = trimmed(request.isbn);
        if let Some(isbn) = &isbn {
            check_isbn_length(isbn)?;
        }

        let metadata = BookMetadata {
            title,
            author: request.author,
            published_date: request.published_date,
            description: request.description.unwrap_or_default(),
            cover_url: request.cover_url,
            isbn,
        };

        self.store
            .insert(sanitized_new_book(metadata, owner)?)
            .await
            .map_err(store_error)
    }

    pub async fn get(&self, id: Uuid) -> Result<BookRecord, AppError> {
        self.store
            .get(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::not_found("Book not found"))
    }

    pub async fn list(&self, params: ListBooksParams) -> Result<Vec<BookRecord>, AppError> {
        // An unrecognized ordering directive falls back to newest-first.
        let ordering = params
            .ordering
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(Ordering::parse)
            .unwrap_or_default();

        let query = BookQuery {
            published_date: params.published_date,
            search: params.search,
            ordering,
        };

        self.store.list(query).await.map_err(store_error)
    }

    pub async fn update(&self, id: Uuid, request: UpdateBookRequest) -> Result<BookRecord, AppError> {
        if let Some(title) = request.title.as_deref() {
            if title.trim().is_empty() {
                return Err(AppError::validation(
                    vec![json!({"field": "title", "error": "must not be empty"})],
                    "title must not be empty",
                ));
            }
        }
        let isbn = trimmed(request.isbn);
        if let Some(isbn) = &isbn {
            check_isbn_length(isbn)?;
        }

        let patch = BookPatch {
            title: request.title.map(|title| title_case(title.trim())),
            author: request.author.map(|author| title_case(author.trim())),
            published_date: request.published_date,
            isbn,
            cover_url: request.cover_url,
            description: request.description,
        };

        self.store
            .update(id, patch)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::not_found("Book not found"))
    }

    /// Remove a record; restricted to privileged callers.
    pub async fn delete(&self, id: Uuid, identity: &Identity) -> Result<(), AppError> {
        if !identity.is_privileged() {
            warn!(user = ?identity.user, book_id = %id, "unprivileged delete attempt");
            return Err(AppError::forbidden("Only admin can delete books."));
        }

        if !self.store.delete(id).await.map_err(store_error)? {
            return Err(AppError::not_found("Book not found"));
        }

        info!(book_id = %id, user = ?identity.user, "book deleted");
        Ok(())
    }

    /// Lookup + author resolution + normalization for one ISBN. The
    /// returned metadata carries the cover derived from the identifier but
    /// not the identifier itself.
    async fn fetch_normalized(&self, isbn: &str) -> Result<BookMetadata, AppError> {
        let edition = self.client.edition_by_isbn(isbn).await?;
        let authors = resolve_authors(self.client.as_ref(), &edition.authors).await;
        let cover = normalize::cover_url_for_isbn(&self.covers_base, isbn);
        Ok(normalize::normalize_edition(&edition, &authors, Some(cover)))
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, AppError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => Err(AppError::validation(
            vec![json!({"field": field, "error": "required"})],
            format!("{field} is required"),
        )),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn check_isbn_length(isbn: &str) -> Result<(), AppError> {
    if isbn.len() > MAX_ISBN_LEN {
        return Err(AppError::validation(
            vec![json!({"field": "isbn", "error": "too long"})],
            "ISBN too long.",
        ));
    }
    Ok(())
}

/// Save-path normalization: trim, title-case, and require a title.
fn sanitized_new_book(metadata: BookMetadata, owner: Option<String>) -> Result<NewBook, AppError> {
    let title = title_case(metadata.title.trim());
    if title.is_empty() {
        return Err(AppError::validation(
            vec![json!({"field": "title", "error": "required"})],
            "title is required",
        ));
    }

    Ok(NewBook {
        title,
        author: metadata.author.map(|author| title_case(author.trim())),
        published_date: metadata.published_date,
        isbn: metadata.isbn,
        cover_url: metadata.cover_url,
        description: metadata.description,
        owner,
    })
}

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::DuplicateIsbn(_) => {
            AppError::conflict(vec![], "Book with this ISBN already exists.")
        }
        StoreError::DuplicateTitleAuthor { .. } => {
            AppError::conflict(vec![], "Book with this title and author already exists.")
        }
        StoreError::Backend(message) => AppError::Internal(anyhow::anyhow!(message)),
    }
}
