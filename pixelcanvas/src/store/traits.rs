//! Core traits for the pixel key-value store.
//!
//! The `KvStore` trait is the only persistence seam in the system. The
//! service opens one store at startup and performs exactly one operation on
//! it per request.
//!
//! # Design Principles
//!
//! - **String keys and values**: the service owns the key and value formats
//! - **Minimal interface**: get, put, delete; no listing, no batches
//! - **Single-key atomicity**: providers must make each put/delete atomic,
//!   concurrent writers to one key resolve as last-write-wins
//! - **Dyn-compatible**: uses `Pin<Box<dyn Future>>` for trait object support
//!
//! # Example
//!
//! ```ignore
//! use pixelcanvas::store::{KvStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.put("5_-3", "#ff0000_US_Seattle_1700000000".to_string()).await?;
//! let value = store.get("5_-3").await?;
//! ```

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error in a persistent provider.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation did not complete within its time budget.
    #[error("Store {operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// Persisted data could not be read back as a value.
    #[error("Corrupt store entry: {0}")]
    Corrupt(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key-value persistence used by the pixel service.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across request tasks.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if the key has never been set or was deleted
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Remove `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the key existed and was removed
    /// - `Ok(false)` if the key did not exist
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;

    /// Approximate number of stored entries.
    fn entry_count(&self) -> u64;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Timeout {
            operation: "get",
            timeout_ms: 250,
        };
        assert_eq!(err.to_string(), "Store get timed out after 250ms");

        let err = StoreError::Corrupt("not utf-8".to_string());
        assert_eq!(err.to_string(), "Corrupt store entry: not utf-8");
    }

    #[test]
    fn test_store_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
        assert!(store_err.to_string().contains("denied"));
    }
}
