//! Storage traits and error types
//!
//! This module defines the trait interface for key-value backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "redis-backend")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for key-value backend implementations
///
/// Values are opaque text; the typed book layer lives in
/// [`BookStore`](crate::storage::BookStore). Each call is atomic on its own
/// key. There are no multi-key transactions.
pub trait KvStore: Send {
    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Gets the value stored under `key`
    fn get(&mut self, key: &str) -> StorageResult<Option<String>>;

    /// Lists every `(key, value)` pair whose key starts with `prefix`
    ///
    /// Pairs are returned sorted by key.
    fn scan_prefix(&mut self, prefix: &str) -> StorageResult<Vec<(String, String)>>;

    /// Deletes `key`, returning true if it existed
    fn delete(&mut self, key: &str) -> StorageResult<bool>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
