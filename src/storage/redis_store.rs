//! Redis storage implementation
//!
//! Compiled with the `redis-backend` feature. Uses SET, GET, DEL and
//! `SCAN MATCH <prefix>*`.

use crate::storage::traits::{KvStore, StorageResult};
use redis::{Client, Commands, Connection};
use std::time::Duration;

/// Redis backend over a single reused connection
pub struct RedisStore {
    conn: Connection,
}

impl RedisStore {
    /// Connects to `redis://host:port/` within `connect_timeout`
    pub fn connect(host: &str, port: u16, connect_timeout: Duration) -> StorageResult<Self> {
        let client = Client::open(format!("redis://{}:{}/", host, port))?;
        let conn = client.get_connection_with_timeout(connect_timeout)?;
        tracing::info!("Connected to redis at {}:{}", host, port);
        Ok(Self { conn })
    }
}

impl KvStore for RedisStore {
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.conn.get(key)?)
    }

    fn scan_prefix(&mut self, prefix: &str) -> StorageResult<Vec<(String, String)>> {
        let mut keys: Vec<String> = self
            .conn
            .scan_match::<_, String>(format!("{}*", prefix))?
            .collect();
        keys.sort();
        keys.dedup();

        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys {
            // A key may vanish between SCAN and GET
            if let Some(value) = self.conn.get::<_, Option<String>>(&key)? {
                pairs.push((key, value));
            }
        }
        Ok(pairs)
    }

    fn delete(&mut self, key: &str) -> StorageResult<bool> {
        let removed: i64 = self.conn.del(key)?;
        Ok(removed > 0)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
