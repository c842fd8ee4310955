//! In-memory store provider using moka.
//!
//! Wraps `moka::future::Cache` without a capacity bound, so nothing is ever
//! evicted: a pixel lives until it is deleted or the process exits.

use moka::future::Cache as MokaCache;

use crate::store::traits::{BoxFuture, KvStore, StoreError};

/// In-memory pixel store.
///
/// The underlying moka cache is lock-free for reads and safe to share
/// across request tasks.
pub struct MemoryStore {
    entries: MokaCache<String, String>,
}

impl MemoryStore {
    /// Create an empty memory store.
    pub fn new() -> Self {
        Self {
            entries: MokaCache::builder().build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.entries.get(&key).await) })
    }

    fn put(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.insert(key, value).await;
            self.entries.run_pending_tasks().await;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let existed = self.entries.remove(&key).await.is_some();
            self.entries.run_pending_tasks().await;
            Ok(existed)
        })
    }

    /// Exact after each put/delete completes; pending maintenance runs
    /// inside those calls.
    fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
