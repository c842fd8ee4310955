//! Key-value persistence for pixel values.
//!
//! The pixel service treats its store as an opaque collaborator offering
//! atomic single-key `get`, `put` and `delete` over string keys and values.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │    PixelService      │  builds "x_y" keys, encodes values
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │   Arc<dyn KvStore>   │  string → string
//! └──────────┬───────────┘
//!            │
//!      ┌─────┴──────┐
//!      ▼            ▼
//! MemoryStore   DiskStore
//! ```

mod providers;
mod traits;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

pub use providers::{DiskStore, MemoryStore};
pub use traits::{BoxFuture, KvStore, StoreError};

/// Which store provider to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-memory store; contents are lost on exit.
    Memory,
    /// File-per-key store rooted at `directory`.
    Disk { directory: PathBuf },
}

impl StoreConfig {
    /// Open the configured provider.
    pub async fn open(&self) -> Result<Arc<dyn KvStore>, StoreError> {
        let store: Arc<dyn KvStore> = match self {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::Disk { directory } => Arc::new(DiskStore::open(directory).await?),
        };

        info!(
            provider = store.name(),
            entries = store.entry_count(),
            "Pixel store opened"
        );

        Ok(store)
    }

    /// Provider name as used in configuration files.
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Disk { .. } => "disk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_memory() {
        let store = StoreConfig::Memory.open().await.unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_open_disk() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::Disk {
            directory: temp.path().join("pixels"),
        };
        let store = config.open().await.unwrap();
        assert_eq!(store.name(), "disk");
        assert_eq!(config.backend_name(), "disk");
    }
}
