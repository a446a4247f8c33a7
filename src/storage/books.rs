//! Typed book layer over a key-value backend
//!
//! Every book lives under `<prefix><id>` as a JSON [`StoredBook`]. Failures of
//! the backend are caught here: they are logged and degraded to `false`,
//! `None` or an empty list, so callers never see a storage error.

use crate::book::{Book, StoredBook};
use crate::storage::traits::{KvStore, StorageError, StorageResult};
use crate::storage::MemoryStore;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Mutex;
use thiserror::Error;

/// Shared handle to the book namespace
pub struct BookStore {
    kv: Mutex<Box<dyn KvStore>>,
    prefix: String,
}

impl BookStore {
    /// Wraps a backend, namespacing every key with `prefix`
    pub fn new<S>(kv: S, prefix: impl Into<String>) -> Self
    where
        S: KvStore + 'static,
    {
        Self {
            kv: Mutex::new(Box::new(kv)),
            prefix: prefix.into(),
        }
    }

    /// An empty in-memory store with the default `book:` prefix
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), "book:")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the storage key of a book id
    pub fn key_for(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Name of the underlying backend
    pub fn backend_name(&self) -> &'static str {
        match self.kv.lock() {
            Ok(kv) => kv.backend_name(),
            Err(_) => "poisoned",
        }
    }

    fn with_kv<T, F>(&self, op: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn KvStore) -> StorageResult<T>,
    {
        let mut kv = self.kv.lock().map_err(|_| StorageError::Poisoned)?;
        op(&mut **kv)
    }

    /// Writes a book under its id, replacing any book with the same title
    ///
    /// Returns false if the backend rejected the write.
    pub fn set_book(&self, book: &Book) -> bool {
        let key = self.key_for(&book.id);
        let value = StoredBook::from(book).to_json();
        match self.with_kv(|kv| kv.set(&key, &value)) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to store {}: {}", key, e);
                false
            }
        }
    }

    /// Reads a single book
    ///
    /// A missing key, an unreadable value and a backend error all yield
    /// `None`; the latter two are logged.
    pub fn get_book(&self, id: &str) -> Option<Book> {
        let key = self.key_for(id);
        let value = match self.with_kv(|kv| kv.get(&key)) {
            Ok(value) => value?,
            Err(e) => {
                tracing::error!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match StoredBook::from_json(&value).and_then(|stored| stored.into_book(id, Utc::now())) {
            Ok(book) => Some(book),
            Err(e) => {
                tracing::warn!("Skipping malformed book at {}: {}", key, e);
                None
            }
        }
    }

    /// Reads every book in the namespace, skipping malformed values
    pub fn scan_books(&self) -> Vec<Book> {
        let pairs = match self.with_kv(|kv| kv.scan_prefix(&self.prefix)) {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::error!("Failed to scan {}*: {}", self.prefix, e);
                return Vec::new();
            }
        };

        let read_at = Utc::now();
        pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let id = key.strip_prefix(&self.prefix).unwrap_or(&key);
                match StoredBook::from_json(&value).and_then(|s| s.into_book(id, read_at)) {
                    Ok(book) => Some(book),
                    Err(e) => {
                        tracing::warn!("Skipping malformed book at {}: {}", key, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Books whose category equals `category`, ignoring case
    pub fn books_by_category(&self, category: &str) -> Vec<Book> {
        self.search(&BookFilter {
            category: Some(category.to_string()),
            ..BookFilter::default()
        })
    }

    /// Books matching every criterion of `filter`
    pub fn search(&self, filter: &BookFilter) -> Vec<Book> {
        self.scan_books()
            .into_iter()
            .filter(|book| filter.matches(book))
            .collect()
    }

    /// Deletes a book, returning true if it existed
    pub fn delete_book(&self, id: &str) -> bool {
        let key = self.key_for(id);
        match self.with_kv(|kv| kv.delete(&key)) {
            Ok(existed) => existed,
            Err(e) => {
                tracing::error!("Failed to delete {}: {}", key, e);
                false
            }
        }
    }
}

/// Rejected filter bounds
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field} must be >= 0, got {value}")]
    NegativeBound { field: &'static str, value: f64 },

    #[error("min_price ({min}) must not exceed max_price ({max})")]
    InvertedRange { min: f64, max: f64 },
}

/// Search criteria over the book namespace
///
/// Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive exact category
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
}

impl BookFilter {
    /// Checks that bounds are non-negative and ordered
    pub fn validate(&self) -> Result<(), FilterError> {
        for (field, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = bound {
                if value.is_nan() || value < 0.0 {
                    return Err(FilterError::NegativeBound { field, value });
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(FilterError::InvertedRange { min, max });
            }
        }

        Ok(())
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(title) = &self.title {
            if !book.title.to_lowercase().contains(&title.to_lowercase()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if book.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if book.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if book.price > max {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{book_id, ParsedBook};

    fn book(title: &str, price: f64, category: &str) -> Book {
        ParsedBook {
            title: title.to_string(),
            price,
            category: category.to_string(),
            image_url: String::new(),
        }
        .into_book(Utc::now())
    }

    /// Backend whose every call fails
    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn set(&mut self, _: &str, _: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn get(&mut self, _: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn scan_prefix(&mut self, _: &str) -> StorageResult<Vec<(String, String)>> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn delete(&mut self, _: &str) -> StorageResult<bool> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    fn seeded() -> BookStore {
        let store = BookStore::in_memory();
        assert!(store.set_book(&book("The Python Cookbook", 15.0, "Programming")));
        assert!(store.set_book(&book("Learning Python", 25.0, "Programming")));
        assert!(store.set_book(&book("Sharp Objects", 10.0, "Mystery")));
        store
    }

    #[test]
    fn test_set_and_get_book() {
        let store = BookStore::in_memory();
        let saved = book("Sharp Objects", 47.82, "Mystery");
        assert!(store.set_book(&saved));

        let fetched = store.get_book(&saved.id).unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(store.key_for(&saved.id), format!("book:{}", saved.id));
    }

    #[test]
    fn test_same_title_overwrites() {
        let store = BookStore::in_memory();
        store.set_book(&book("Same Title", 5.0, "Mystery"));
        store.set_book(&book("Same Title", 6.0, "Fiction"));

        let books = store.scan_books();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].category, "Fiction");
        assert_eq!(books[0].id, book_id("Same Title"));
    }

    #[test]
    fn test_scan_skips_malformed_values() {
        let mut kv = MemoryStore::new();
        kv.set("book:bad-json", "{not json").unwrap();
        kv.set("book:no-title", r#"{"price": 1.0, "category": "x"}"#)
            .unwrap();
        kv.set("book:legacy", r#"{"title": "Old", "price": 2.0, "category": "x"}"#)
            .unwrap();
        kv.set("other:1", r#"{"title": "Elsewhere", "price": 2.0, "category": "x"}"#)
            .unwrap();
        let store = BookStore::new(kv, "book:");

        let books = store.scan_books();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Old");
        assert_eq!(books[0].id, "legacy");
    }

    #[test]
    fn test_get_book_malformed_is_none() {
        let mut kv = MemoryStore::new();
        kv.set("book:x", "[]").unwrap();
        let store = BookStore::new(kv, "book:");
        assert_eq!(store.get_book("x"), None);
        assert_eq!(store.get_book("missing"), None);
    }

    #[test]
    fn test_books_by_category_ignores_case() {
        let store = seeded();
        let books = store.books_by_category("programming");
        assert_eq!(books.len(), 2);
        assert!(store.books_by_category("Program").is_empty());
    }

    #[test]
    fn test_search_combines_criteria() {
        let store = seeded();
        let filter = BookFilter {
            title: Some("python".to_string()),
            category: Some("PROGRAMMING".to_string()),
            min_price: Some(10.0),
            max_price: Some(20.0),
        };

        let books = store.search(&filter);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "The Python Cookbook");
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let store = seeded();
        let filter = BookFilter {
            min_price: Some(10.0),
            max_price: Some(15.0),
            ..BookFilter::default()
        };
        assert_eq!(store.search(&filter).len(), 2);
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let store = seeded();
        assert_eq!(store.search(&BookFilter::default()).len(), 3);
    }

    #[test]
    fn test_delete_book() {
        let store = seeded();
        let id = book_id("Sharp Objects");
        assert!(store.delete_book(&id));
        assert!(!store.delete_book(&id));
        assert_eq!(store.get_book(&id), None);
    }

    #[test]
    fn test_backend_failures_degrade() {
        let store = BookStore::new(BrokenStore, "book:");
        assert!(!store.set_book(&book("x", 1.0, "y")));
        assert_eq!(store.get_book("x"), None);
        assert!(store.scan_books().is_empty());
        assert!(!store.delete_book("x"));
        assert_eq!(store.backend_name(), "broken");
    }

    #[test]
    fn test_filter_validation() {
        let ok = BookFilter {
            min_price: Some(10.0),
            max_price: Some(10.0),
            ..BookFilter::default()
        };
        assert!(ok.validate().is_ok());

        let negative = BookFilter {
            min_price: Some(-1.0),
            ..BookFilter::default()
        };
        assert_eq!(
            negative.validate(),
            Err(FilterError::NegativeBound {
                field: "min_price",
                value: -1.0
            })
        );

        let inverted = BookFilter {
            min_price: Some(20.0),
            max_price: Some(10.0),
            ..BookFilter::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(FilterError::InvertedRange {
                min: 20.0,
                max: 10.0
            })
        );
    }
}
