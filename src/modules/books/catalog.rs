//! In-memory book catalog.
//!
//! [`BookCatalog`] owns the collection and is the only way to read or change
//! it. Operations are synchronous; callers sharing one catalog serialise
//! access through [`SharedCatalog`].

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::ids::IdGenerator;
use super::models::{Book, BookInput, BookSummary, ListFilter, ValidationError};

/// Catalog handle shared between request handlers.
pub type SharedCatalog = Arc<RwLock<BookCatalog>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("book '{0}' not found")]
    NotFound(String),

    #[error("book '{0}' was not found after insertion")]
    Internal(String),
}

pub struct BookCatalog {
    books: Vec<Book>,
    ids: Arc<dyn IdGenerator>,
}

impl BookCatalog {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            books: Vec::new(),
            ids,
        }
    }

    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Validate and append a new book, returning its id.
    pub fn create(&mut self, input: BookInput) -> Result<String, CatalogError> {
        let fields = input.validate().inspect_err(|err| {
            tracing::debug!(error = %err, "rejected new book");
        })?;

        let id = self.ids.generate();
        let now = OffsetDateTime::now_utc();
        let finished = fields.is_finished();

        self.books.push(Book {
            id: id.clone(),
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            reading: fields.reading,
            finished,
            inserted_at: now,
            updated_at: now,
        });

        if self.position(&id).is_none() {
            tracing::error!(book_id = %id, "book missing right after insertion");
            return Err(CatalogError::Internal(id));
        }

        tracing::info!(book_id = %id, total = self.books.len(), "book added");
        Ok(id)
    }

    /// Projections of the books matching `filter`, in insertion order.
    pub fn list<'a>(&'a self, filter: &'a ListFilter) -> impl Iterator<Item = BookSummary> + 'a {
        self.books
            .iter()
            .filter(move |book| filter.matches(book))
            .map(BookSummary::from)
    }

    pub fn get(&self, id: &str) -> Result<&Book, CatalogError> {
        self.position(id)
            .map(|index| &self.books[index])
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Replace every client supplied field of an existing book.
    ///
    /// `id`, `inserted_at` and `finished` are kept as they were.
    pub fn update(&mut self, id: &str, input: BookInput) -> Result<(), CatalogError> {
        let fields = input.validate().inspect_err(|err| {
            tracing::debug!(book_id = %id, error = %err, "rejected book update");
        })?;

        let index = self
            .position(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        let book = &mut self.books[index];
        book.name = fields.name;
        book.year = fields.year;
        book.author = fields.author;
        book.summary = fields.summary;
        book.publisher = fields.publisher;
        book.page_count = fields.page_count;
        book.read_page = fields.read_page;
        book.reading = fields.reading;
        book.updated_at = OffsetDateTime::now_utc();

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<(), CatalogError> {
        let index = self
            .position(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        self.books.remove(index);
        tracing::info!(book_id = %id, total = self.books.len(), "book deleted");
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::ids::SequentialIdGenerator;
    use serde_json::json;

    fn catalog() -> BookCatalog {
        BookCatalog::new(Arc::new(SequentialIdGenerator::new("book")))
    }

    fn input(name: &str, page_count: u32, read_page: u32, reading: bool) -> BookInput {
        BookInput {
            name: Some(name.to_string()),
            year: Some(json!(2010)),
            author: Some(json!("Author")),
            summary: Some(json!("Summary")),
            publisher: Some(json!(format!("{name} Press"))),
            page_count,
            read_page,
            reading,
        }
    }

    fn names(catalog: &BookCatalog, filter: ListFilter) -> Vec<String> {
        catalog.list(&filter).map(|summary| summary.name).collect()
    }

    #[test]
    fn create_returns_id_of_stored_book() {
        let mut catalog = catalog();

        let id = catalog.create(input("A", 100, 100, false)).unwrap();
        let book = catalog.get(&id).unwrap();

        assert_eq!(id, "book-000001");
        assert_eq!(book.name, "A");
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[test]
    fn create_computes_unfinished() {
        let mut catalog = catalog();
        let id = catalog.create(input("A", 100, 40, true)).unwrap();
        assert!(!catalog.get(&id).unwrap().finished);
    }

    #[test]
    fn create_without_name_leaves_catalog_untouched() {
        let mut catalog = catalog();
        let err = catalog
            .create(BookInput {
                name: None,
                ..input("", 10, 0, false)
            })
            .unwrap_err();

        assert_eq!(err, CatalogError::Validation(ValidationError::MissingName));
        assert!(catalog.is_empty());
    }

    #[test]
    fn create_with_read_page_above_page_count_is_rejected() {
        let mut catalog = catalog();
        let err = catalog.create(input("B", 100, 150, false)).unwrap_err();

        assert_eq!(
            err,
            CatalogError::Validation(ValidationError::ReadPageExceedsPageCount)
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn list_projects_in_insertion_order() {
        let mut catalog = catalog();
        for name in ["Zeta", "Alpha", "Mid"] {
            catalog.create(input(name, 10, 0, false)).unwrap();
        }

        let all: Vec<BookSummary> = catalog.list(&ListFilter::All).collect();
        assert_eq!(
            all,
            vec![
                BookSummary {
                    id: "book-000001".to_string(),
                    name: "Zeta".to_string(),
                    publisher: Some(json!("Zeta Press")),
                },
                BookSummary {
                    id: "book-000002".to_string(),
                    name: "Alpha".to_string(),
                    publisher: Some(json!("Alpha Press")),
                },
                BookSummary {
                    id: "book-000003".to_string(),
                    name: "Mid".to_string(),
                    publisher: Some(json!("Mid Press")),
                },
            ]
        );
    }

    #[test]
    fn list_is_recomputed_each_call() {
        let mut catalog = catalog();
        catalog.create(input("A", 10, 0, false)).unwrap();
        assert_eq!(catalog.list(&ListFilter::All).count(), 1);

        catalog.create(input("B", 10, 0, false)).unwrap();
        assert_eq!(catalog.list(&ListFilter::All).count(), 2);
    }

    #[test]
    fn reading_filter_splits_catalog() {
        let mut catalog = catalog();
        catalog.create(input("Reading", 10, 1, true)).unwrap();
        catalog.create(input("Shelved", 10, 1, false)).unwrap();
        catalog.create(input("Also reading", 10, 1, true)).unwrap();

        assert_eq!(
            names(&catalog, ListFilter::Reading(true)),
            vec!["Reading", "Also reading"]
        );
        assert_eq!(names(&catalog, ListFilter::Reading(false)), vec!["Shelved"]);
    }

    #[test]
    fn finished_filter_splits_catalog() {
        let mut catalog = catalog();
        catalog.create(input("Done", 10, 10, false)).unwrap();
        catalog.create(input("Halfway", 10, 5, false)).unwrap();

        assert_eq!(names(&catalog, ListFilter::Finished(true)), vec!["Done"]);
        assert_eq!(names(&catalog, ListFilter::Finished(false)), vec!["Halfway"]);
    }

    #[test]
    fn name_filter_matches_substrings() {
        let mut catalog = catalog();
        catalog.create(input("Dicoding Guide", 10, 0, false)).unwrap();
        catalog.create(input("Rust in Action", 10, 0, false)).unwrap();
        catalog.create(input("The dicoding way", 10, 0, false)).unwrap();

        assert_eq!(
            names(&catalog, ListFilter::Name("dicoding".to_string())),
            vec!["Dicoding Guide", "The dicoding way"]
        );
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let catalog = catalog();
        assert_eq!(
            catalog.get("zzz").unwrap_err(),
            CatalogError::NotFound("zzz".to_string())
        );
    }

    #[test]
    fn update_replaces_fields_and_keeps_identity() {
        let mut catalog = catalog();
        let id = catalog.create(input("Old", 100, 10, false)).unwrap();
        let inserted_at = catalog.get(&id).unwrap().inserted_at;

        catalog
            .update(
                &id,
                BookInput {
                    name: Some("New".to_string()),
                    page_count: 200,
                    read_page: 20,
                    reading: true,
                    ..BookInput::default()
                },
            )
            .unwrap();

        let book = catalog.get(&id).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "New");
        assert_eq!(book.page_count, 200);
        assert_eq!(book.read_page, 20);
        assert!(book.reading);
        assert_eq!(book.inserted_at, inserted_at);
        assert!(book.updated_at >= book.inserted_at);
        // Whole-record replace: omitted fields are cleared.
        assert_eq!(book.author, None);
        assert_eq!(book.publisher, None);
        assert_eq!(book.year, None);
    }

    #[test]
    fn descriptive_fields_are_stored_as_sent() {
        let mut catalog = catalog();
        let id = catalog
            .create(BookInput {
                year: Some(json!("2010")),
                publisher: Some(json!(["P", "Q"])),
                ..input("A", 10, 0, false)
            })
            .unwrap();

        let book = catalog.get(&id).unwrap();
        assert_eq!(book.year, Some(json!("2010")));
        assert_eq!(book.author, Some(json!("Author")));
        let summary = catalog.list(&ListFilter::All).next().unwrap();
        assert_eq!(summary.publisher, Some(json!(["P", "Q"])));
    }

    #[test]
    fn update_does_not_recompute_finished() {
        let mut catalog = catalog();
        let id = catalog.create(input("A", 100, 10, false)).unwrap();

        catalog.update(&id, input("A", 100, 100, false)).unwrap();
        assert!(!catalog.get(&id).unwrap().finished);

        let done = catalog.create(input("B", 50, 50, false)).unwrap();
        catalog.update(&done, input("B", 50, 0, false)).unwrap();
        assert!(catalog.get(&done).unwrap().finished);
    }

    #[test]
    fn update_with_read_page_above_page_count_leaves_book_unchanged() {
        let mut catalog = catalog();
        let id = catalog.create(input("A", 100, 10, false)).unwrap();
        let before = catalog.get(&id).unwrap().clone();

        let err = catalog.update(&id, input("A", 100, 101, false)).unwrap_err();

        assert_eq!(
            err,
            CatalogError::Validation(ValidationError::ReadPageExceedsPageCount)
        );
        assert_eq!(catalog.get(&id).unwrap(), &before);
    }

    #[test]
    fn update_validates_before_looking_up_id() {
        let mut catalog = catalog();
        let err = catalog
            .update(
                "zzz",
                BookInput {
                    name: None,
                    ..BookInput::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, CatalogError::Validation(ValidationError::MissingName));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut catalog = catalog();
        catalog.create(input("A", 10, 0, false)).unwrap();

        let err = catalog.update("zzz", input("B", 10, 0, false)).unwrap_err();

        assert_eq!(err, CatalogError::NotFound("zzz".to_string()));
        assert_eq!(names(&catalog, ListFilter::All), vec!["A"]);
    }

    #[test]
    fn delete_removes_only_that_book() {
        let mut catalog = catalog();
        let first = catalog.create(input("A", 10, 0, false)).unwrap();
        catalog.create(input("B", 10, 0, false)).unwrap();

        catalog.delete(&first).unwrap();

        assert_eq!(names(&catalog, ListFilter::All), vec!["B"]);
        assert!(matches!(catalog.get(&first), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut catalog = catalog();
        catalog.create(input("A", 10, 0, false)).unwrap();

        assert_eq!(
            catalog.delete("zzz").unwrap_err(),
            CatalogError::NotFound("zzz".to_string())
        );
        assert_eq!(catalog.len(), 1);
    }
}
