//! HTTP routes for the Books module.

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use shelf_http::{error::AppError, response::ApiResponse};

use super::catalog::{CatalogError, SharedCatalog};
use super::models::{Book, BookInput, BookQuery, BookSummary, ListFilter, ValidationError};
use crate::utils;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

/// Build the Books router over `catalog`. Paths are relative to the module's
/// base path.
pub fn router(catalog: SharedCatalog) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::info!(target: "shelf.routes", %prefix, "registering books routes");

    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(catalog)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(catalog): State<SharedCatalog>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedBook>>), AppError> {
    let Json(input) = payload?;
    let book_id = catalog
        .write()
        .await
        .create(input)
        .map_err(|err| catalog_error(err, Operation::Add))?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(CreatedBook { book_id }).with_message("Book added successfully"),
        ),
    ))
}

async fn list_books(
    State(catalog): State<SharedCatalog>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<ApiResponse<BookList>> {
    let filter = ListFilter::from(BookQuery::from_pairs(pairs));
    let books = catalog.read().await.list(&filter).collect();

    Json(ApiResponse::success(BookList { books }))
}

async fn get_book(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BookDetail>>, AppError> {
    let book = catalog
        .read()
        .await
        .get(&id)
        .cloned()
        .map_err(lookup_error)?;

    Ok(Json(ApiResponse::success(BookDetail { book })))
}

async fn update_book(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(input) = payload?;
    catalog
        .write()
        .await
        .update(&id, input)
        .map_err(|err| catalog_error(err, Operation::Update))?;

    Ok(Json(ApiResponse::message("Book updated successfully")))
}

async fn delete_book(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    catalog
        .write()
        .await
        .delete(&id)
        .map_err(|err| catalog_error(err, Operation::Delete))?;

    Ok(Json(ApiResponse::message("Book deleted successfully")))
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    fn failure(self) -> &'static str {
        match self {
            Operation::Add => "Failed to add book",
            Operation::Update => "Failed to update book",
            Operation::Delete => "Failed to delete book",
        }
    }
}

/// Lookups report a missing book without naming an operation.
fn lookup_error(err: CatalogError) -> AppError {
    match err {
        CatalogError::NotFound(_) => AppError::not_found("Book not found"),
        other => AppError::Internal(anyhow::Error::new(other)),
    }
}

/// Translate a catalog failure into the client facing error for `operation`.
fn catalog_error(err: CatalogError, operation: Operation) -> AppError {
    let failure = operation.failure();
    match err {
        CatalogError::Validation(ValidationError::MissingName) => {
            AppError::validation(format!("{failure}. Please provide the book name"))
        }
        CatalogError::Validation(ValidationError::ReadPageExceedsPageCount) => {
            AppError::validation(format!(
                "{failure}. readPage cannot be greater than pageCount"
            ))
        }
        CatalogError::NotFound(_) => AppError::not_found(format!("{failure}. Id not found")),
        CatalogError::Internal(id) => AppError::Internal(
            anyhow!("book '{}' missing after insertion", id).context(failure),
        ),
    }
}
