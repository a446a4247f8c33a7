//! Book records
//!
//! This module defines the unit of storage and its two sibling shapes:
//! - [`ParsedBook`]: what the item parser extracts from a single listing
//! - [`Book`]: a parsed book with its content-derived id and timestamp
//! - [`StoredBook`]: the versioned JSON value kept in the key-value store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Schema version written by this crate
pub const SCHEMA_VERSION: u32 = 1;

/// Computes the content-derived id of a book
///
/// The id is the lowercase hex SHA-256 of the title bytes. Two listings with
/// the same title always map to the same id, whatever their category.
///
/// # Example
///
/// ```
/// use shelf_scraper::book_id;
///
/// assert_eq!(book_id("Sharp Objects"), book_id("Sharp Objects"));
/// assert_eq!(book_id("Sharp Objects").len(), 64);
/// ```
pub fn book_id(title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hex::encode(hasher.finalize())
}

/// A book as extracted from one listing fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBook {
    pub title: String,
    pub price: f64,
    pub category: String,
    /// Absolute image URL, or empty when the listing has no image
    pub image_url: String,
}

impl ParsedBook {
    /// Returns true if the price does not exceed `ceiling`
    pub fn within_price(&self, ceiling: f64) -> bool {
        self.price <= ceiling
    }

    /// Assigns the content-derived id and a creation timestamp
    pub fn into_book(self, created_at: DateTime<Utc>) -> Book {
        Book {
            id: book_id(&self.title),
            title: self.title,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            created_at,
        }
    }
}

/// A complete book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Reasons a stored value cannot be turned into a [`Book`]
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("stored value is not valid JSON: {0}")]
    Json(String),

    #[error("title is missing or empty")]
    MissingTitle,

    #[error("price is missing")]
    MissingPrice,

    #[error("price {0} is negative or not finite")]
    InvalidPrice(f64),

    #[error("category is missing")]
    MissingCategory,

    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u32),
}

/// The JSON value kept under a book key
///
/// Every field is optional on read: older writers did not store `id`,
/// `created_at` or `schema_version`, and some stored no image. The defaulting
/// policy lives in [`StoredBook::into_book`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredBook {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Book> for StoredBook {
    fn from(book: &Book) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            id: Some(book.id.clone()),
            title: Some(book.title.clone()),
            price: Some(book.price),
            category: Some(book.category.clone()),
            image_url: Some(book.image_url.clone()),
            created_at: Some(book.created_at),
        }
    }
}

impl StoredBook {
    /// Decodes a stored JSON value
    pub fn from_json(value: &str) -> Result<Self, RecordError> {
        serde_json::from_str(value).map_err(|e| RecordError::Json(e.to_string()))
    }

    /// Encodes this record as JSON text
    pub fn to_json(&self) -> String {
        // Serializing plain strings, floats and timestamps cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Applies the read-time defaulting policy
    ///
    /// | Field | Missing | Invalid |
    /// |-------|---------|---------|
    /// | title | reject | empty ⇒ reject |
    /// | price | reject | negative / NaN ⇒ reject |
    /// | category | reject | - |
    /// | image_url | empty string | - |
    /// | created_at | `read_at` | - |
    /// | id | ignored, the key id wins | ignored |
    pub fn into_book(self, key_id: &str, read_at: DateTime<Utc>) -> Result<Book, RecordError> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(RecordError::UnsupportedVersion(self.schema_version));
        }

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(RecordError::MissingTitle)?;

        let price = self.price.ok_or(RecordError::MissingPrice)?;
        if !price.is_finite() || price < 0.0 {
            return Err(RecordError::InvalidPrice(price));
        }

        let category = self.category.ok_or(RecordError::MissingCategory)?;

        if let Some(stored_id) = self.id.as_deref() {
            if stored_id != key_id {
                tracing::debug!(
                    "Stored id {} differs from key id {}, using key id",
                    stored_id,
                    key_id
                );
            }
        }

        Ok(Book {
            id: key_id.to_string(),
            title,
            price,
            category,
            image_url: self.image_url.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(read_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn parsed(title: &str, price: f64) -> ParsedBook {
        ParsedBook {
            title: title.to_string(),
            price,
            category: "Mystery".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_book_id_is_deterministic() {
        assert_eq!(book_id("A Light in the Attic"), book_id("A Light in the Attic"));
        assert_ne!(book_id("A Light in the Attic"), book_id("A Light in the attic"));
    }

    #[test]
    fn test_book_id_known_value() {
        // sha256("abc")
        assert_eq!(
            book_id("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_within_price_is_inclusive() {
        assert!(parsed("a", 20.0).within_price(20.0));
        assert!(parsed("a", 19.99).within_price(20.0));
        assert!(!parsed("a", 20.01).within_price(20.0));
    }

    #[test]
    fn test_into_book_assigns_id_from_title() {
        let book = parsed("Same Title", 10.0).into_book(fixed_time());
        assert_eq!(book.id, book_id("Same Title"));
        assert_eq!(book.created_at, fixed_time());
    }

    #[test]
    fn test_stored_roundtrip_keeps_fields() {
        let book = parsed("Sharp Objects", 47.82).into_book(fixed_time());
        let json = StoredBook::from(&book).to_json();
        let restored = StoredBook::from_json(&json)
            .unwrap()
            .into_book(&book.id, Utc::now())
            .unwrap();
        assert_eq!(restored, book);
    }

    #[test]
    fn test_legacy_value_gets_defaults() {
        let json = r#"{"title": "Old", "price": 3.5, "category": "Poetry"}"#;
        let book = StoredBook::from_json(json)
            .unwrap()
            .into_book("abc", fixed_time())
            .unwrap();
        assert_eq!(book.id, "abc");
        assert_eq!(book.image_url, "");
        assert_eq!(book.created_at, fixed_time());
    }

    #[test]
    fn test_key_id_wins_over_stored_id() {
        let json = r#"{"id": "7", "title": "Old", "price": 3.5, "category": "Poetry"}"#;
        let book = StoredBook::from_json(json)
            .unwrap()
            .into_book("deadbeef", fixed_time())
            .unwrap();
        assert_eq!(book.id, "deadbeef");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let cases = [
            (r#"{"price": 1.0, "category": "x"}"#, RecordError::MissingTitle),
            (r#"{"title": " ", "price": 1.0, "category": "x"}"#, RecordError::MissingTitle),
            (r#"{"title": "t", "category": "x"}"#, RecordError::MissingPrice),
            (r#"{"title": "t", "price": -1.0, "category": "x"}"#, RecordError::InvalidPrice(-1.0)),
            (r#"{"title": "t", "price": 1.0}"#, RecordError::MissingCategory),
        ];

        for (json, expected) in cases {
            let result = StoredBook::from_json(json).unwrap().into_book("k", fixed_time());
            assert_eq!(result.unwrap_err(), expected, "value: {}", json);
        }
    }

    #[test]
    fn test_future_schema_is_rejected() {
        let json = r#"{"schema_version": 9, "title": "t", "price": 1.0, "category": "x"}"#;
        let result = StoredBook::from_json(json).unwrap().into_book("k", fixed_time());
        assert_eq!(result.unwrap_err(), RecordError::UnsupportedVersion(9));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            StoredBook::from_json("not json"),
            Err(RecordError::Json(_))
        ));
    }
}
