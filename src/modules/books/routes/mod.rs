//! HTTP boundary for the books module.
//!
//! Handlers stay thin: extract, delegate to the service, map to a status.
//! All failure shaping happens in [`AppError`].

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use atheneum_authz::Identity;
use atheneum_http::error::AppError;
use atheneum_store::BookRecord;

use super::models::{
    BookMetadata, CreateBookRequest, FetchAndSaveRequest, FetchBookParams, ListBooksParams,
    SaveFromSearchRequest, SearchOpenParams, SearchResult, UpdateBookRequest,
};
use super::service::BookService;

pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/fetch-book", get(fetch_book))
        .route("/fetch-and-save", post(fetch_and_save))
        .route("/search-open", get(search_open))
        .route("/save-from-search", post(save_from_search))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn fetch_book(
    State(service): State<Arc<BookService>>,
    Query(params): Query<FetchBookParams>,
) -> Result<Json<BookMetadata>, AppError> {
    let metadata = service.fetch_by_isbn(params.isbn.as_deref()).await?;
    Ok(Json(metadata))
}

async fn fetch_and_save(
    State(service): State<Arc<BookService>>,
    identity: Identity,
    Json(request): Json<FetchAndSaveRequest>,
) -> Result<(StatusCode, Json<BookRecord>), AppError> {
    let record = service
        .fetch_and_save(request.isbn.as_deref(), identity.user)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn search_open(
    State(service): State<Arc<BookService>>,
    Query(params): Query<SearchOpenParams>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let results = service.search_by_title(params.title.as_deref()).await?;
    Ok(Json(results))
}

async fn save_from_search(
    State(service): State<Arc<BookService>>,
    identity: Identity,
    Json(request): Json<SaveFromSearchRequest>,
) -> Result<(StatusCode, Json<BookRecord>), AppError> {
    let record = service.save_from_search(request, identity.user).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_books(
    State(service): State<Arc<BookService>>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<Vec<BookRecord>>, AppError> {
    let records = service.list(params).await?;
    Ok(Json(records))
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    identity: Identity,
    Json(request): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookRecord>), AppError> {
    let record = service.create(request, identity.user).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookRecord>, AppError> {
    let record = service.get(id).await?;
    Ok(Json(record))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<Json<BookRecord>, AppError> {
    let record = service.update(id, request).await?;
    Ok(Json(record))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(id, &identity).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use atheneum_store::MemoryStore;

    use crate::modules::books::catalog::testing::MockCatalog;
    use crate::modules::books::catalog::types::{AuthorRef, RawAuthor, RawEdition};

    use super::*;

    fn app_with(catalog: MockCatalog) -> (Router, Arc<BookService>) {
        let service = Arc::new(BookService::new(
            Arc::new(catalog),
            Arc::new(MemoryStore::new()),
            "https://covers.openlibrary.org".to_string(),
        ));
        (router(service.clone()), service)
    }

    fn dune_catalog() -> MockCatalog {
        MockCatalog {
            edition: Some(RawEdition {
                title: Some("Dune".to_string()),
                publish_date: Some("1965".to_string()),
                authors: vec![AuthorRef {
                    key: Some("/authors/OL1A".to_string()),
                }],
                description: None,
            }),
            authors: std::collections::HashMap::from([(
                "/authors/OL1A".to_string(),
                RawAuthor {
                    name: Some("Frank Herbert".to_string()),
                },
            )]),
            ..Default::default()
        }
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_isbn_is_rejected_before_any_lookup() {
        let (app, _) = app_with(MockCatalog {
            panic_on_use: true,
            ..Default::default()
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/fetch-book")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_title_is_rejected_before_any_lookup() {
        let (app, _) = app_with(MockCatalog {
            panic_on_use: true,
            ..Default::default()
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/search-open")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fetch_book_returns_ok_with_metadata() {
        let (app, _) = app_with(dune_catalog());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/fetch-book?isbn=0441013597")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_isbn_maps_to_not_found() {
        let (app, _) = app_with(MockCatalog::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/fetch-book?isbn=0000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transport_failure_maps_to_bad_gateway() {
        let (app, _) = app_with(MockCatalog {
            fail_transport: true,
            ..Default::default()
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/fetch-book?isbn=0441013597")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn fetch_and_save_is_created_then_conflict() {
        let (app, _) = app_with(dune_catalog());

        let response = app
            .clone()
            .oneshot(json_post("/fetch-and-save", r#"{"isbn": "0451524934"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_post("/fetch-and-save", r#"{"isbn": "0451524934"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn save_from_search_requires_author() {
        let (app, _) = app_with(MockCatalog::default());

        let response = app
            .oneshot(json_post("/save-from-search", r#"{"title": "Dune"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_is_forbidden_without_privilege() {
        let (app, service) = app_with(MockCatalog::default());
        let record = service
            .create(
                CreateBookRequest {
                    title: Some("Dune".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", record.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(service.get(record.id).await.is_ok());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", record.id))
                    .header(atheneum_authz::ROLE_HEADER, "admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(service.get(record.id).await.is_err());
    }

    #[tokio::test]
    async fn get_unknown_book_is_not_found() {
        let (app, _) = app_with(MockCatalog::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", Uuid::nil()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
