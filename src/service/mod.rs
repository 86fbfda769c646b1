//! Book service layer.
//!
//! # Data Flow
//! ```text
//! CreateBookRequest / UpdateBookRequest
//!     → book.rs (BookService)
//!         → validation (report or usage fault)
//!         → storage.rs (Storage trait, MemoryStorage)
//!     → Result<Book, AppError>
//!     → error.rs (AppError::status_code for a transport adapter)
//! ```
//!
//! # Design Decisions
//! - Validation runs before any write
//! - Usage faults are logged at error level and surface as 500
//! - Validation reports surface as 400 with every issue attached

pub mod book;
pub mod error;
pub mod storage;

pub use book::BookService;
pub use error::AppError;
pub use storage::{MemoryStorage, Storage, StorageError};
