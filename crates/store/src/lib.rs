//! Persistence gateway for canonical book records.
//!
//! The store is an injected repository: callers depend on [`BookStore`] and
//! receive a concrete backend (currently [`memory::MemoryStore`]) at wiring
//! time. Uniqueness of the dedup key (ISBN, else title+author) is enforced
//! here, inside the insert critical section, so concurrent writers cannot
//! slip past an advisory existence check.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod model;

pub use memory::MemoryStore;
pub use model::{BookPatch, BookQuery, BookRecord, NewBook, Ordering, SortKey};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("book titled '{title}' by '{author}' already exists")]
    DuplicateTitleAuthor { title: String, author: String },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Repository trait for persisting canonical book records
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new record, assigning `id` and `created_at`.
    /// Rejects dedup-key duplicates atomically.
    async fn insert(&self, new: NewBook) -> Result<BookRecord>;

    async fn get(&self, id: Uuid) -> Result<Option<BookRecord>>;

    /// Field-level partial update; `owner` and `created_at` are not
    /// reachable through [`BookPatch`]. Returns `None` for an unknown id.
    async fn update(&self, id: Uuid, patch: BookPatch) -> Result<Option<BookRecord>>;

    /// Remove a record; returns whether anything was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool>;

    /// Case-insensitive match on the (title, author) dedup key.
    async fn exists_by_title_author(&self, title: &str, author: &str) -> Result<bool>;

    async fn list(&self, query: BookQuery) -> Result<Vec<BookRecord>>;
}
