//! Service-level errors.

use thiserror::Error;

use crate::service::storage::StorageError;
use crate::validation::{UsageFault, ValidationReport};

/// Failure of a [`BookService`](crate::service::BookService) call.
///
/// Each variant maps to an HTTP-style status code so that a transport
/// adapter can translate it without inspecting messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// The client sent data that failed validation.
    #[error("invalid book data\n{0}")]
    InvalidInput(ValidationReport),

    /// Path id and body id disagree.
    #[error("book id {body} does not match path id {path}")]
    IdMismatch { path: u64, body: u64 },

    #[error("book {0} not found")]
    NotFound(u64),

    #[error("book {0} already exists")]
    Conflict(u64),

    /// The validator was misused. A bug in the caller, not bad input.
    #[error("{context}: {source}")]
    Validator {
        context: &'static str,
        #[source]
        source: UsageFault,
    },

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) | AppError::IdMismatch { .. } => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Validator { .. } | AppError::Storage { .. } => 500,
        }
    }

    /// True for errors caused by the client rather than the service.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Map a storage failure, keeping not-found and conflicts distinct.
    pub fn from_storage(context: &'static str, err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => AppError::NotFound(id),
            StorageError::AlreadyExists(id) => AppError::Conflict(id),
            other => AppError::Storage {
                context,
                source: other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationIssue;

    #[test]
    fn test_status_codes() {
        let invalid = AppError::InvalidInput(ValidationReport::new(vec![ValidationIssue::new(
            "id",
            "id cannot be zero",
        )]));
        assert_eq!(invalid.status_code(), 400);
        assert!(invalid.is_client_error());
        assert!(invalid.to_string().contains("id cannot be zero"));

        let fault = AppError::Validator {
            context: "error creating a book",
            source: UsageFault::Absent,
        };
        assert_eq!(fault.status_code(), 500);
        assert!(!fault.is_client_error());
        assert_eq!(
            fault.to_string(),
            "error creating a book: cannot validate an absent value"
        );
    }

    #[test]
    fn test_from_storage() {
        assert!(matches!(
            AppError::from_storage("x", StorageError::NotFound(3)),
            AppError::NotFound(3)
        ));
        assert!(matches!(
            AppError::from_storage("x", StorageError::AlreadyExists(3)),
            AppError::Conflict(3)
        ));
        let full = AppError::from_storage("failed to create a book", StorageError::CapacityExceeded(1));
        assert_eq!(full.status_code(), 500);
    }
}
