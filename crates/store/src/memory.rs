use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::debug;
use uuid::{Timestamp, Uuid};

use crate::model::{BookPatch, BookQuery, BookRecord, NewBook, SortKey};
use crate::{BookStore, Result, StoreError};

/// In-memory store implementation.
///
/// Dedup-key uniqueness is checked and the record inserted under one write
/// lock, which serializes concurrent check-then-create callers.
pub struct MemoryStore {
    books: RwLock<HashMap<Uuid, BookRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Dedup check: ISBN when present, else the (title, author) pair.
/// `exclude` skips the record being updated.
fn find_duplicate(
    books: &HashMap<Uuid, BookRecord>,
    candidate: &BookRecord,
    exclude: Option<Uuid>,
) -> Option<StoreError> {
    if let Some(isbn) = non_empty(&candidate.isbn) {
        let clash = books.values().any(|book| {
            Some(book.id) != exclude && non_empty(&book.isbn).is_some_and(|other| other == isbn)
        });
        return clash.then(|| StoreError::DuplicateIsbn(isbn.to_string()));
    }

    let author = candidate.author.as_deref().unwrap_or("");
    let clash = books.values().any(|book| {
        Some(book.id) != exclude
            && non_empty(&book.isbn).is_none()
            && book.title.eq_ignore_ascii_case(&candidate.title)
            && book
                .author
                .as_deref()
                .unwrap_or("")
                .eq_ignore_ascii_case(author)
    });
    clash.then(|| StoreError::DuplicateTitleAuthor {
        title: candidate.title.clone(),
        author: author.to_string(),
    })
}

fn compare(a: &BookRecord, b: &BookRecord, key: SortKey) -> CmpOrdering {
    let primary = match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        // Records missing the sort field go last regardless of direction.
        SortKey::PublishedDate => match (non_empty(&a.published_date), non_empty(&b.published_date))
        {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => CmpOrdering::Less,
            (None, Some(_)) => CmpOrdering::Greater,
            (None, None) => CmpOrdering::Equal,
        },
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    };
    primary.then_with(|| a.created_at.cmp(&b.created_at))
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn insert(&self, new: NewBook) -> Result<BookRecord> {
        let mut books = self
            .books
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let record = BookRecord {
            id: Uuid::new_v7(Timestamp::now(uuid::NoContext)),
            title: new.title,
            author: new.author,
            published_date: new.published_date,
            isbn: new.isbn,
            cover_url: new.cover_url,
            description: new.description,
            owner: new.owner,
            created_at: OffsetDateTime::now_utc(),
        };

        if let Some(conflict) = find_duplicate(&books, &record, None) {
            return Err(conflict);
        }

        debug!(book_id = %record.id, title = %record.title, "created book record");
        books.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BookRecord>> {
        let books = self
            .books
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(books.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, patch: BookPatch) -> Result<Option<BookRecord>> {
        let mut books = self
            .books
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let Some(existing) = books.get(&id) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(author) = patch.author {
            updated.author = Some(author);
        }
        if let Some(published_date) = patch.published_date {
            updated.published_date = Some(published_date);
        }
        if let Some(isbn) = patch.isbn {
            updated.isbn = Some(isbn);
        }
        if let Some(cover_url) = patch.cover_url {
            updated.cover_url = Some(cover_url);
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }

        // A patched dedup key must not collide with another record.
        if let Some(conflict) = find_duplicate(&books, &updated, Some(id)) {
            return Err(conflict);
        }

        debug!(book_id = %id, "updated book record");
        books.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut books = self
            .books
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let removed = books.remove(&id).is_some();
        if removed {
            debug!(book_id = %id, "deleted book record");
        }
        Ok(removed)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        let books = self
            .books
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(books
            .values()
            .any(|book| non_empty(&book.isbn).is_some_and(|other| other == isbn)))
    }

    async fn exists_by_title_author(&self, title: &str, author: &str) -> Result<bool> {
        let books = self
            .books
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(books.values().any(|book| {
            book.title.eq_ignore_ascii_case(title)
                && book
                    .author
                    .as_deref()
                    .unwrap_or("")
                    .eq_ignore_ascii_case(author)
        }))
    }

    async fn list(&self, query: BookQuery) -> Result<Vec<BookRecord>> {
        let books = self
            .books
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let mut records: Vec<BookRecord> = books
            .values()
            .filter(|book| match &query.published_date {
                Some(date) => book.published_date.as_deref() == Some(date.as_str()),
                None => true,
            })
            .filter(|book| match &query.search {
                Some(needle) => {
                    let needle = needle.to_lowercase();
                    book.title.to_lowercase().contains(&needle)
                        || book
                            .author
                            .as_deref()
                            .is_some_and(|author| author.to_lowercase().contains(&needle))
                }
                None => true,
            })
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            let ordering = compare(a, b, query.ordering.key);
            if query.ordering.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ordering;

    fn new_book(title: &str, author: Option<&str>, isbn: Option<&str>) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.map(str::to_string),
            isbn: isbn.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let store = MemoryStore::new();
        let record = store
            .insert(new_book("The Hobbit", Some("J.R.R. Tolkien"), None))
            .await
            .unwrap();

        assert_eq!(record.title, "The Hobbit");
        assert!(store.get(record.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert(new_book("1984", Some("George Orwell"), Some("0451524934")))
            .await
            .unwrap();

        let err = store
            .insert(new_book("1984 reissue", None, Some("0451524934")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIsbn(_)));
    }

    #[tokio::test]
    async fn duplicate_title_author_is_rejected_case_insensitively() {
        let store = MemoryStore::new();
        store
            .insert(new_book("Dune", Some("Frank Herbert"), None))
            .await
            .unwrap();

        let err = store
            .insert(new_book("dune", Some("frank herbert"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitleAuthor { .. }));
    }

    #[tokio::test]
    async fn records_with_isbn_do_not_collide_on_title() {
        let store = MemoryStore::new();
        store
            .insert(new_book("Dune", Some("Frank Herbert"), Some("0441013597")))
            .await
            .unwrap();

        // Same title but a distinct ISBN is a distinct edition.
        store
            .insert(new_book("Dune", Some("Frank Herbert"), Some("9780441013593")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn exists_checks_cover_both_dedup_keys() {
        let store = MemoryStore::new();
        store
            .insert(new_book("Dune", Some("Frank Herbert"), Some("0441013597")))
            .await
            .unwrap();

        assert!(store.exists_by_isbn("0441013597").await.unwrap());
        assert!(!store.exists_by_isbn("0000000000").await.unwrap());
        assert!(store
            .exists_by_title_author("DUNE", "frank herbert")
            .await
            .unwrap());
        assert!(!store
            .exists_by_title_author("Dune Messiah", "Frank Herbert")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn update_patches_fields_and_keeps_created_at() {
        let store = MemoryStore::new();
        let record = store
            .insert(new_book("the hobbit", Some("J.R.R. Tolkien"), None))
            .await
            .unwrap();

        let updated = store
            .update(
                record.id,
                BookPatch {
                    title: Some("The Hobbit".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("record exists");

        assert_eq!(updated.title, "The Hobbit");
        assert_eq!(updated.author.as_deref(), Some("J.R.R. Tolkien"));
        assert_eq!(updated.created_at, record.created_at);
        assert_eq!(updated.owner, record.owner);
    }

    #[tokio::test]
    async fn update_rejects_isbn_collision() {
        let store = MemoryStore::new();
        store
            .insert(new_book("1984", Some("George Orwell"), Some("0451524934")))
            .await
            .unwrap();
        let other = store
            .insert(new_book("Animal Farm", Some("George Orwell"), Some("0452284244")))
            .await
            .unwrap();

        let err = store
            .update(
                other.id,
                BookPatch {
                    isbn: Some("0451524934".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIsbn(_)));
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = MemoryStore::new();
        let result = store
            .update(Uuid::nil(), BookPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryStore::new();
        let record = store
            .insert(new_book("Dune", Some("Frank Herbert"), None))
            .await
            .unwrap();

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.get(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_defaults_to_newest_first() {
        let store = MemoryStore::new();
        store
            .insert(new_book("First", None, None))
            .await
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        store
            .insert(new_book("Second", None, None))
            .await
            .unwrap();

        let records = store.list(BookQuery::default()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Second");
        assert_eq!(records[1].title, "First");
    }

    #[tokio::test]
    async fn list_filters_and_searches() {
        let store = MemoryStore::new();
        store
            .insert(NewBook {
                title: "Dune".to_string(),
                author: Some("Frank Herbert".to_string()),
                published_date: Some("1965".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .insert(NewBook {
                title: "The Hobbit".to_string(),
                author: Some("J.R.R. Tolkien".to_string()),
                published_date: Some("1937".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let filtered = store
            .list(BookQuery {
                published_date: Some("1965".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Dune");

        let searched = store
            .list(BookQuery {
                search: Some("tolkien".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].title, "The Hobbit");
    }

    #[tokio::test]
    async fn list_orders_by_title() {
        let store = MemoryStore::new();
        store.insert(new_book("Zorba", None, None)).await.unwrap();
        store.insert(new_book("abaddon", None, None)).await.unwrap();

        let ascending = store
            .list(BookQuery {
                ordering: Ordering::parse("title").unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ascending[0].title, "abaddon");

        let descending = store
            .list(BookQuery {
                ordering: Ordering::parse("-title").unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(descending[0].title, "Zorba");
    }
}
