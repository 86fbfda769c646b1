//! Book storage.
//!
//! # Responsibilities
//! - Define the storage contract used by the service layer
//! - Provide a concurrent in-memory implementation
//!
//! # Design Decisions
//! - Storage never validates; callers validate before saving
//! - `get_all` returns books ordered by id for deterministic listings
//! - Capacity is reserved with an atomic counter while the entry is held,
//!   so concurrent inserts never exceed it and a duplicate id is reported
//!   as such even when the store is full

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::models::Book;

/// Errors raised by a [`Storage`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("book {0} not found")]
    NotFound(u64),

    #[error("book {0} already exists")]
    AlreadyExists(u64),

    #[error("store is full ({0} books)")]
    CapacityExceeded(usize),
}

/// Book persistence contract.
pub trait Storage: Send + Sync {
    /// All books, ordered by id.
    fn get_all(&self) -> Result<Vec<Book>, StorageError>;

    fn get_by_id(&self, id: u64) -> Result<Book, StorageError>;

    /// Insert a new book. Fails if the id is taken.
    fn save(&self, book: Book) -> Result<(), StorageError>;

    /// Replace an existing book. Fails if the id is unknown.
    fn update(&self, book: Book) -> Result<(), StorageError>;

    fn delete(&self, id: u64) -> Result<(), StorageError>;
}

/// A thread-safe in-memory book store.
#[derive(Debug)]
pub struct MemoryStorage {
    books: DashMap<u64, Book>,
    count: AtomicUsize,
    capacity: usize,
}

impl MemoryStorage {
    /// Create an empty store holding at most `capacity` books.
    pub fn new(capacity: usize) -> Self {
        Self {
            books: DashMap::new(),
            count: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Claim one slot, failing when the store is full.
    fn reserve(&self) -> Result<(), StorageError> {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| StorageError::CapacityExceeded(self.capacity))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_all(&self) -> Result<Vec<Book>, StorageError> {
        let mut books: Vec<Book> = self.books.iter().map(|r| r.value().clone()).collect();
        books.sort_by_key(Book::id);
        Ok(books)
    }

    fn get_by_id(&self, id: u64) -> Result<Book, StorageError> {
        self.books
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StorageError::NotFound(id))
    }

    fn save(&self, book: Book) -> Result<(), StorageError> {
        match self.books.entry(book.id()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(book.id())),
            Entry::Vacant(slot) => {
                self.reserve()?;
                slot.insert(book);
                Ok(())
            }
        }
    }

    fn update(&self, book: Book) -> Result<(), StorageError> {
        match self.books.get_mut(&book.id()) {
            Some(mut existing) => {
                *existing = book;
                Ok(())
            }
            None => Err(StorageError::NotFound(book.id())),
        }
    }

    fn delete(&self, id: u64) -> Result<(), StorageError> {
        self.books
            .remove(&id)
            .map(|_| {
                self.count.fetch_sub(1, Ordering::AcqRel);
            })
            .ok_or(StorageError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneralBook, Timestamp};

    fn book(id: u64) -> Book {
        Book {
            general: GeneralBook {
                id,
                title: format!("Book {}", id),
                genre: "Fiction".into(),
                publication_date: Timestamp::default(),
                author: "Anon".into(),
            },
            created_at: Timestamp::default(),
            updated_at: Timestamp::default(),
        }
    }

    #[test]
    fn test_save_and_get() {
        let store = MemoryStorage::new(10);
        store.save(book(2)).unwrap();
        store.save(book(1)).unwrap();

        assert_eq!(store.get_by_id(2).unwrap().general.title, "Book 2");
        let ids: Vec<_> = store.get_all().unwrap().iter().map(Book::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_and_missing() {
        let store = MemoryStorage::new(10);
        store.save(book(1)).unwrap();
        assert_eq!(store.save(book(1)), Err(StorageError::AlreadyExists(1)));
        assert_eq!(store.get_by_id(9), Err(StorageError::NotFound(9)));
        assert_eq!(store.update(book(9)), Err(StorageError::NotFound(9)));
        assert_eq!(store.delete(9), Err(StorageError::NotFound(9)));
    }

    #[test]
    fn test_update_and_delete() {
        let store = MemoryStorage::new(10);
        store.save(book(1)).unwrap();

        let mut changed = book(1);
        changed.general.title = "Renamed".into();
        store.update(changed).unwrap();
        assert_eq!(store.get_by_id(1).unwrap().general.title, "Renamed");

        store.delete(1).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity() {
        let store = MemoryStorage::new(1);
        store.save(book(1)).unwrap();
        assert_eq!(store.save(book(2)), Err(StorageError::CapacityExceeded(1)));

        // a duplicate is a conflict even when the store is full
        assert_eq!(store.save(book(1)), Err(StorageError::AlreadyExists(1)));

        store.delete(1).unwrap();
        store.save(book(2)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_capacity_under_concurrent_saves() {
        let store = MemoryStorage::new(10);
        let saved = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for worker in 0..8u64 {
                let store = &store;
                let saved = &saved;
                scope.spawn(move || {
                    for n in 0..10 {
                        if store.save(book(worker * 100 + n)).is_ok() {
                            saved.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });
        assert_eq!(saved.load(Ordering::Relaxed), 10);
        assert_eq!(store.len(), 10);
    }
}
