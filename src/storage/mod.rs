//! Storage module for persisting scraped books
//!
//! This module handles the key-value namespace shared by the scraper (write
//! path) and the API (read path), including:
//! - The backend-agnostic [`KvStore`] trait
//! - SQLite, in-memory and (optionally) Redis backends
//! - The typed [`BookStore`] with its scan and filter queries

mod books;
mod memory;
#[cfg(feature = "redis-backend")]
mod redis_store;
mod schema;
mod sqlite;
mod traits;

pub use books::{BookFilter, BookStore, FilterError};
pub use memory::MemoryStore;
#[cfg(feature = "redis-backend")]
pub use redis_store::RedisStore;
pub use sqlite::SqliteStore;
pub use traits::{KvStore, StorageError, StorageResult};

use crate::config::{StoreBackend, StoreConfig};
use std::path::Path;

/// Opens the backend selected by the configuration
///
/// # Arguments
///
/// * `config` - The store section of the configuration
///
/// # Returns
///
/// * `Ok(BookStore)` - Backend opened or connected
/// * `Err(StorageError)` - Backend unavailable
pub fn open_store(config: &StoreConfig) -> StorageResult<BookStore> {
    let store = match config.backend {
        StoreBackend::Sqlite => BookStore::new(
            SqliteStore::new(Path::new(&config.database_path))?,
            config.key_prefix.clone(),
        ),
        StoreBackend::Memory => BookStore::new(MemoryStore::new(), config.key_prefix.clone()),
        StoreBackend::Redis => open_redis(config)?,
    };

    tracing::info!(
        "Opened {} store with key prefix '{}'",
        store.backend_name(),
        store.prefix()
    );
    Ok(store)
}

#[cfg(feature = "redis-backend")]
fn open_redis(config: &StoreConfig) -> StorageResult<BookStore> {
    let kv = RedisStore::connect(
        &config.redis_host,
        config.redis_port,
        std::time::Duration::from_secs(config.connect_timeout_secs),
    )?;
    Ok(BookStore::new(kv, config.key_prefix.clone()))
}

#[cfg(not(feature = "redis-backend"))]
fn open_redis(_config: &StoreConfig) -> StorageResult<BookStore> {
    Err(StorageError::Unavailable(
        "redis backend requires the `redis-backend` feature".to_string(),
    ))
}
