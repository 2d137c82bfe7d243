pub mod catalog;
pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use atheneum_kernel::settings::Settings;
use atheneum_kernel::{InitCtx, Module};
use atheneum_store::MemoryStore;
use axum::Router;
use serde_json::json;

use catalog::OpenLibraryClient;
use service::BookService;

/// Books module: external catalog lookup, normalization, and the personal
/// library over the record store
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = Arc::new(OpenLibraryClient::new(&settings.catalog)?);
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(BookService::new(
            client,
            store,
            settings.catalog.covers_base_url.clone(),
        ));

        Ok(Self { service })
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            catalog = %ctx.settings.catalog.base_url,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List library books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "published_date",
                                "in": "query",
                                "description": "Exact match on the stored published date",
                                "schema": {"type": "string"}
                            },
                            {
                                "name": "search",
                                "in": "query",
                                "description": "Substring match on title or author",
                                "schema": {"type": "string"}
                            },
                            {
                                "name": "ordering",
                                "in": "query",
                                "description": "published_date or title, with - prefix for descending",
                                "schema": {"type": "string"}
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books, newest first by default",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {"$ref": "#/components/schemas/Book"}
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book manually",
                        "tags": ["Books"],
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing or invalid fields",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "409": {
                                "description": "Duplicate book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get one book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    },
                    "patch": {
                        "summary": "Edit book fields",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book (admin/staff only)",
                        "tags": ["Books"],
                        "responses": {
                            "204": {"description": "Deleted"},
                            "403": {
                                "description": "Caller is not privileged",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/fetch-book": {
                    "get": {
                        "summary": "Fetch normalized metadata for an ISBN without saving",
                        "tags": ["Catalog"],
                        "parameters": [
                            {
                                "name": "isbn",
                                "in": "query",
                                "required": true,
                                "schema": {"type": "string"}
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Normalized metadata",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/BookMetadata"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing isbn",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown ISBN upstream",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "502": {
                                "description": "Catalog unavailable",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/fetch-and-save": {
                    "post": {
                        "summary": "Fetch an ISBN and save it to the library",
                        "tags": ["Catalog"],
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing isbn or validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown ISBN upstream",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "409": {
                                "description": "Book already saved",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "502": {
                                "description": "Catalog unavailable",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/search-open": {
                    "get": {
                        "summary": "Search the open catalog by title (top 15)",
                        "tags": ["Catalog"],
                        "parameters": [
                            {
                                "name": "title",
                                "in": "query",
                                "required": true,
                                "schema": {"type": "string"}
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Search results in upstream order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {"$ref": "#/components/schemas/SearchResult"}
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing title",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "502": {
                                "description": "Catalog unavailable",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/save-from-search": {
                    "post": {
                        "summary": "Save a picked search result to the library",
                        "tags": ["Catalog"],
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing title or author",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "409": {
                                "description": "Book already saved",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": {
                                        "schema": {"type": "string"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "format": "uuid",
                                "description": "System-assigned stable identifier"
                            },
                            "title": {"type": "string"},
                            "author": {"type": "string", "nullable": true},
                            "published_date": {"type": "string", "nullable": true},
                            "isbn": {"type": "string", "nullable": true},
                            "cover_url": {"type": "string", "nullable": true},
                            "description": {"type": "string"},
                            "owner": {"type": "string", "nullable": true},
                            "created_at": {"type": "string", "format": "date-time"}
                        },
                        "required": ["id", "title", "description", "created_at"]
                    },
                    "BookMetadata": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "author": {"type": "string", "nullable": true},
                            "published_date": {"type": "string", "nullable": true},
                            "description": {"type": "string"},
                            "cover_url": {"type": "string", "nullable": true},
                            "isbn": {"type": "string", "nullable": true}
                        },
                        "required": ["title", "description"]
                    },
                    "SearchResult": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "published_year": {
                                "type": "string",
                                "description": "Year as text, or the literal Unknown"
                            },
                            "isbn": {"type": "string", "nullable": true},
                            "cover_url": {"type": "string", "nullable": true}
                        },
                        "required": ["title", "author", "published_year"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    Ok(Arc::new(BooksModule::new(settings)?))
}
