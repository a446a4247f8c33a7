//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the KvStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{KvStore, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database file at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Escapes `%`, `_` and `\` so a prefix can be used in a LIKE pattern
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl KvStore for SqliteStore {
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn scan_prefix(&mut self, prefix: &str) -> StorageResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kv WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key")?;

        let rows = stmt.query_map(params![like_prefix(prefix)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut pairs = Vec::new();
        for row in rows {
            let (key, value) = row?;
            // LIKE is case-insensitive for ASCII; keep the prefix match exact
            if key.starts_with(prefix) {
                pairs.push((key, value));
            }
        }
        Ok(pairs)
    }

    fn delete(&mut self, key: &str) -> StorageResult<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_overwrite() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.set("book:1", "first").unwrap();
        assert_eq!(store.get("book:1").unwrap().as_deref(), Some("first"));

        store.set("book:1", "second").unwrap();
        assert_eq!(store.get("book:1").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_get_missing() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        assert_eq!(store.get("book:nope").unwrap(), None);
    }

    #[test]
    fn test_scan_prefix_is_exact_and_sorted() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.set("book:b", "2").unwrap();
        store.set("book:a", "1").unwrap();
        store.set("BOOK:c", "upper").unwrap();
        store.set("headline:a", "x").unwrap();
        store.set("book_x", "underscore").unwrap();

        let pairs = store.scan_prefix("book:").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("book:a".to_string(), "1".to_string()),
                ("book:b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_prefix_with_like_wildcards() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.set("a_b:1", "x").unwrap();
        store.set("axb:1", "y").unwrap();

        let pairs = store.scan_prefix("a_b:").unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "a_b:1");
    }

    #[test]
    fn test_delete() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.set("book:1", "x").unwrap();
        assert!(store.delete("book:1").unwrap());
        assert!(!store.delete("book:1").unwrap());
        assert_eq!(store.get("book:1").unwrap(), None);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.db");

        {
            let mut store = SqliteStore::new(&path).unwrap();
            store.set("book:1", "kept").unwrap();
        }

        let mut reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.get("book:1").unwrap().as_deref(), Some("kept"));
    }
}
