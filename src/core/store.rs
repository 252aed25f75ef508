//! Remote key-value store seam
//!
//! The pipeline persists pattern records in a remote hash keyed by the
//! registry name, and keeps ad-hoc cookie sets per pattern. In production
//! the trait fronts a Redis-style server; the shipped `MemoryStore` keeps
//! everything in process and doubles as the test backend.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Errors from store backend operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Remote key-value store operations the core relies on.
///
/// Implementations must be safe to share across tasks; every method is a
/// suspension point.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// All fields of the hash at `key` (empty map when the hash is absent)
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Write one field of the hash at `key`, overwriting any existing value
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Bulk-write `fields` into the hash at `key`
    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError>;

    /// Remove `field` from the hash at `key`; removing an absent field is
    /// not an error
    async fn hdel(&self, key: &str, field: &str) -> Result<(), StoreError>;

    /// Add `member` to the set at `key`
    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// A random member of the set at `key`, or `None` when the set is empty
    /// or absent
    async fn srandmember(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Release the connection. Must be safe to call more than once; the
    /// manager calls this unconditionally on every exit path.
    async fn close(&self);
}

#[derive(Default)]
struct MemoryStoreInner {
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, Vec<String>>,
}

/// In-process store backend.
///
/// `srandmember` returns an arbitrary member rather than a uniformly random
/// one; the trait contract only promises a member.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryStore {
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let hash = inner.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(hash) = inner.hashes.get_mut(key) {
            hash.remove(field);
        }
        Ok(())
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let set = inner.sets.entry(key.to_string()).or_default();
        if !set.iter().any(|m| m == member) {
            set.push(member.to_string());
        }
        Ok(())
    }

    async fn srandmember(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.sets.get(key).and_then(|set| set.first().cloned()))
    }

    async fn close(&self) {
        // Nothing held open
    }
}
