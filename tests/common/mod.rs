//! Shared fixtures for integration tests.

#![allow(dead_code)]

use books_api::models::{CreateBookRequest, GeneralBook, Timestamp, UpdateBookRequest};
use chrono::{TimeZone, Utc};

pub fn valid_time() -> Timestamp {
    Timestamp(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
}

/// A book that passes every rule.
pub fn clean_book(id: u64) -> GeneralBook {
    GeneralBook {
        id,
        title: "Clean Code".to_string(),
        genre: "Programming".to_string(),
        publication_date: valid_time(),
        author: "Robert C. Martin".to_string(),
    }
}

pub fn create_request(id: u64) -> CreateBookRequest {
    CreateBookRequest {
        book: clean_book(id),
    }
}

pub fn update_request(book: GeneralBook) -> UpdateBookRequest {
    UpdateBookRequest { book }
}
