//! Book domain types.

pub mod book;
pub mod timestamp;

pub use book::{Book, CreateBookRequest, GeneralBook, UpdateBookRequest};
pub use timestamp::Timestamp;
