//! In-memory storage implementation

use crate::storage::traits::{KvStore, StorageResult};
use std::collections::BTreeMap;

/// Process-local backend, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&mut self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn scan_prefix(&mut self, prefix: &str) -> StorageResult<Vec<(String, String)>> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn delete(&mut self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_prefix_stops_at_namespace_end() {
        let mut store = MemoryStore::new();
        store.set("a:1", "x").unwrap();
        store.set("book:2", "b").unwrap();
        store.set("book:1", "a").unwrap();
        store.set("booking:1", "other").unwrap();
        store.set("c:1", "y").unwrap();

        let keys: Vec<String> = store
            .scan_prefix("book:")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["book:1", "book:2"]);
    }

    #[test]
    fn test_delete_reports_existence() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert!(store.delete("k").unwrap());
        assert!(!store.delete("k").unwrap());
        assert!(store.is_empty());
    }
}
