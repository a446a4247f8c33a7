//! Shelf-Scraper: a book catalog scraper with a key-value backed API
//!
//! This crate crawls a paginated book catalog, parses each listing into a
//! [`Book`], persists accepted books into a key-value store, and serves them
//! back through a small HTTP API.

pub mod api;
pub mod book;
pub mod catalog;
pub mod config;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Shelf-Scraper operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid environment override {name}: {message}")]
    Env { name: &'static str, message: String },
}

/// Result type alias for Shelf-Scraper operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use book::{book_id, Book, ParsedBook};
pub use catalog::{ScrapeLimits, ScrapeReport, Scraper};
pub use config::Config;
pub use storage::{BookFilter, BookStore};
