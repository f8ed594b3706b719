//! Book Store - In-memory record collection
//!
//! Holds validated books for the lifetime of the process. Nothing is
//! persisted. The store is shared between request handlers, so every
//! operation runs under a `RwLock`; mutations take the write lock for the
//! whole read-then-write sequence.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{Book, BookFields};

/// Registry of books, kept in insertion order
#[derive(Debug, Default)]
pub struct BookStore {
    books: RwLock<Vec<Book>>,
}

impl BookStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with two demonstration books
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        for fields in sample_books() {
            store.insert(fields);
        }
        store
    }

    /// All books, in insertion order
    pub fn list(&self) -> Vec<Book> {
        self.read().clone()
    }

    /// Get a book by id
    pub fn get(&self, id: &str) -> StoreResult<Book> {
        self.read()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Store new content under a freshly generated id
    pub fn insert(&self, fields: BookFields) -> Book {
        let mut books = self.write();
        let id = Self::generate_id(&books);
        let book = Book::from_fields(id, fields);
        books.push(book.clone());
        book
    }

    /// Replace all content fields of an existing book
    pub fn update(&self, id: &str, fields: BookFields) -> StoreResult<Book> {
        let mut books = self.write();
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        book.replace_fields(fields);
        Ok(book.clone())
    }

    /// Remove a book, returning it
    pub fn delete(&self, id: &str) -> StoreResult<Book> {
        let mut books = self.write();
        let index = books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(books.remove(index))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A v4 UUID not already used by any stored book
    fn generate_id(books: &[Book]) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !books.iter().any(|b| b.id == id) {
                return id;
            }
        }
    }

    // No operation leaves the Vec half-updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Book>> {
        self.books.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Book>> {
        self.books.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Demonstration dataset loaded at startup
pub fn sample_books() -> Vec<BookFields> {
    vec![
        BookFields {
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            published_year: 1925,
        },
        BookFields {
            title: "To Kill a Mockingbird".to_string(),
            author: "Harper Lee".to_string(),
            published_year: 1960,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> BookFields {
        BookFields {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            published_year: 1965,
        }
    }

    #[test]
    fn test_insert_then_get() {
        let store = BookStore::new();
        let book = store.insert(dune());

        assert!(!book.id.is_empty());
        let fetched = store.get(&book.id).unwrap();
        assert_eq!(fetched, book);
        assert_eq!(fetched.fields(), dune());
    }

    #[test]
    fn test_insert_generates_unique_ids() {
        let store = BookStore::new();
        let a = store.insert(dune());
        let b = store.insert(dune());
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = BookStore::new();
        let first = store.insert(dune());
        let second = store.insert(BookFields {
            title: "Emma".into(),
            author: "Austen".into(),
            published_year: 1815,
        });
        let ids: Vec<_> = store.list().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_update_preserves_id() {
        let store = BookStore::new();
        let book = store.insert(dune());
        let updated = store
            .update(
                &book.id,
                BookFields {
                    title: "Dune Messiah".into(),
                    author: "Frank Herbert".into(),
                    published_year: 1969,
                },
            )
            .unwrap();

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(store.get(&book.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_does_not_mutate() {
        let store = BookStore::new();
        let book = store.insert(dune());
        let before = store.list();

        let result = store.update("missing", dune());
        assert_eq!(result, Err(StoreError::NotFound("missing".into())));
        assert_eq!(store.list(), before);
        assert_eq!(store.get(&book.id).unwrap().fields(), dune());
    }

    #[test]
    fn test_delete_then_get() {
        let store = BookStore::new();
        let book = store.insert(dune());

        let removed = store.delete(&book.id).unwrap();
        assert_eq!(removed.id, book.id);
        assert_eq!(store.get(&book.id), Err(StoreError::NotFound(book.id.clone())));
        assert_eq!(store.delete(&book.id), Err(StoreError::NotFound(book.id)));
    }

    #[test]
    fn test_dune_scenario() {
        let store = BookStore::new();
        assert!(store.is_empty());

        let book = store.insert(dune());
        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].fields(), dune());

        store.delete(&book.id).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_sample_data() {
        let store = BookStore::with_sample_data();
        assert_eq!(store.len(), 2);
        let titles: Vec<_> = store.list().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["The Great Gatsby", "To Kill a Mockingbird"]);
    }

    #[test]
    fn test_concurrent_inserts() {
        let store = std::sync::Arc::new(BookStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.insert(dune());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let books = store.list();
        assert_eq!(books.len(), 200);
        let mut ids: Vec<_> = books.into_iter().map(|b| b.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
