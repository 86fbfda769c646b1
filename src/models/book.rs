//! Book records.

use serde::{Deserialize, Serialize};

use crate::models::timestamp::Timestamp;

/// The client-facing part of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralBook {
    /// Unique id; zero means "not yet assigned".
    pub id: u64,
    pub title: String,
    /// e.g. Adventure, Programming.
    pub genre: String,
    pub publication_date: Timestamp,
    pub author: String,
}

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub general: GeneralBook,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Book {
    pub fn id(&self) -> u64 {
        self.general.id
    }
}

/// Body of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub book: GeneralBook,
}

/// Body of an update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub book: GeneralBook,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "book": {
                "id": 1,
                "title": "Clean Code",
                "genre": "Programming",
                "publicationDate": "2008-08-01T00:00:00Z",
                "author": "Robert C. Martin"
            }
        }"#;
        let request: CreateBookRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.book.id, 1);
        assert_eq!(request.book.author, "Robert C. Martin");
        assert_eq!(
            request.book.publication_date.to_string(),
            "2008-08-01T00:00:00+00:00"
        );
    }
}
