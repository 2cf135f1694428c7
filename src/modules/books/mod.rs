pub mod catalog;
pub mod ids;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{settings::Settings, InitCtx, Module};

use catalog::{BookCatalog, SharedCatalog};
use ids::{IdGenerator, RandomIdGenerator};

/// Books module: owns the in-memory catalog and serves it under `/books`
pub struct BooksModule {
    catalog: SharedCatalog,
}

impl BooksModule {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            catalog: BookCatalog::new(ids).into_shared(),
        }
    }

    /// Handle to the catalog served by this module
    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn base_path(&self) -> String {
        "/books".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            id_length = ctx.settings.catalog.id_length,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let fail = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);
        let book_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookInput" }
                }
            }
        });
        let message_ok = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/MessageResponse" }
                    }
                }
            })
        };
        let flag_param = |name: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": "1 selects books with the flag set, any other value the rest",
                "schema": { "type": "string" }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "description": "Only one filter is applied: reading, then finished, then name",
                        "tags": ["Books"],
                        "parameters": [
                            flag_param("reading"),
                            flag_param("finished"),
                            {
                                "name": "name",
                                "in": "query",
                                "required": false,
                                "description": "Case-insensitive substring of the book name",
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string" },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "books": {
                                                            "type": "array",
                                                            "items": { "$ref": "#/components/schemas/BookSummary" }
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": book_body.clone(),
                        "responses": {
                            "201": {
                                "description": "Book added",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string" },
                                                "message": { "type": "string" },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "bookId": { "type": "string" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "400": fail("Missing name or readPage greater than pageCount"),
                            "500": fail("Book could not be stored")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string" },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "book": { "$ref": "#/components/schemas/Book" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": fail("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": book_body,
                        "responses": {
                            "200": message_ok("Book updated"),
                            "400": fail("Missing name or readPage greater than pageCount"),
                            "404": fail("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": message_ok("Book deleted"),
                            "404": fail("Book not found")
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
                                        "schema": { "type": "string" }
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
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "year": { "description": "Stored as sent" },
                            "author": { "description": "Stored as sent" },
                            "summary": { "description": "Stored as sent" },
                            "publisher": { "description": "Stored as sent" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "reading": { "type": "boolean" },
                            "finished": { "type": "boolean" },
                            "insertedAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "pageCount", "readPage", "reading", "finished", "insertedAt", "updatedAt"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "year": { "description": "Any JSON value, usually an integer" },
                            "author": { "description": "Any JSON value, usually a string" },
                            "summary": { "description": "Any JSON value, usually a string" },
                            "publisher": { "description": "Any JSON value, usually a string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "reading": { "type": "boolean" }
                        },
                        "required": ["name"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "publisher": { "description": "Stored as sent" }
                        },
                        "required": ["id", "name"]
                    },
                    "MessageResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "message": { "type": "string" }
                        },
                        "required": ["status", "message"]
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
        let discarded = self.catalog.read().await.len();
        tracing::info!(
            module = self.name(),
            discarded,
            "books module stopped, in-memory catalog discarded"
        );
        Ok(())
    }
}

/// Create the books module with random ids sized by `settings`
pub fn create_module(settings: &Settings) -> Arc<dyn Module> {
    let ids = RandomIdGenerator::new(settings.catalog.id_length);
    Arc::new(BooksModule::new(Arc::new(ids)))
}
