//! Book business logic.

use std::sync::Arc;

use serde::Serialize;

use crate::models::{Book, CreateBookRequest, Timestamp, UpdateBookRequest};
use crate::observability::metrics;
use crate::service::error::AppError;
use crate::service::storage::Storage;
use crate::validation::Validator;

/// Validates book requests and keeps the store consistent.
pub struct BookService<S: Storage> {
    storage: Arc<S>,
    validator: Arc<Validator>,
}

impl<S: Storage> Clone for BookService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<S: Storage> BookService<S> {
    pub fn new(storage: Arc<S>, validator: Arc<Validator>) -> Self {
        Self { storage, validator }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All books, ordered by id.
    pub fn get_books(&self) -> Result<Vec<Book>, AppError> {
        let result = self.storage.get_all().map_err(|e| {
            tracing::error!(error = %e, "Error getting all books");
            AppError::from_storage("error getting all books", e)
        });
        finish("get_books", result)
    }

    pub fn get_book(&self, id: u64) -> Result<Book, AppError> {
        let result = self.storage.get_by_id(id).map_err(|e| {
            tracing::info!(id, error = %e, "Failed to get book by id");
            AppError::from_storage("error getting a book", e)
        });
        finish("get_book", result)
    }

    /// Validate and store a new book.
    pub fn create_book(&self, request: CreateBookRequest) -> Result<Book, AppError> {
        let result = self.try_create(request);
        finish("create_book", result)
    }

    fn try_create(&self, request: CreateBookRequest) -> Result<Book, AppError> {
        self.check(&request, "error creating a book")?;

        let now = Timestamp::now();
        let book = Book {
            general: request.book,
            created_at: now,
            updated_at: now,
        };
        self.storage.save(book.clone()).map_err(|e| {
            tracing::error!(id = book.id(), error = %e, "Error saving a book");
            AppError::from_storage("failed to create a book", e)
        })?;

        tracing::info!(id = book.id(), "Book created");
        Ok(book)
    }

    /// Validate and apply an update to an existing book.
    ///
    /// `created_at` is kept; `updated_at` is set to now.
    pub fn update_book(&self, id: u64, request: UpdateBookRequest) -> Result<Book, AppError> {
        let result = self.try_update(id, request);
        finish("update_book", result)
    }

    fn try_update(&self, id: u64, request: UpdateBookRequest) -> Result<Book, AppError> {
        let existing = self.storage.get_by_id(id).map_err(|e| {
            tracing::info!(id, error = %e, "Failed to update a book");
            AppError::from_storage("error updating a book", e)
        })?;

        self.check(&request, "error updating a book")?;
        if request.book.id != id {
            return Err(AppError::IdMismatch {
                path: id,
                body: request.book.id,
            });
        }

        let book = Book {
            general: request.book,
            created_at: existing.created_at,
            updated_at: Timestamp::now(),
        };
        self.storage.update(book.clone()).map_err(|e| {
            tracing::error!(id, error = %e, "Error updating a book");
            AppError::from_storage("failed to update a book", e)
        })?;

        tracing::info!(id, "Book updated");
        Ok(book)
    }

    pub fn delete_book(&self, id: u64) -> Result<(), AppError> {
        let result = self.storage.delete(id).map_err(|e| {
            tracing::info!(id, error = %e, "Failed to delete a book");
            AppError::from_storage("error deleting a book", e)
        });
        if result.is_ok() {
            tracing::info!(id, "Book deleted");
        }
        finish("delete_book", result)
    }

    /// Run the validator, separating caller bugs from bad input.
    fn check<T: Serialize>(&self, record: &T, context: &'static str) -> Result<(), AppError> {
        let report = self.validator.validate(record).map_err(|fault| {
            tracing::error!(error = %fault, "Error validation");
            AppError::Validator {
                context,
                source: fault,
            }
        })?;

        if !report.is_valid() {
            tracing::warn!(issues = report.len(), "Invalid book data");
            return Err(AppError::InvalidInput(report));
        }
        Ok(())
    }
}

fn finish<T>(op: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status_code(),
    };
    metrics::record_operation(op, status);
    result
}
