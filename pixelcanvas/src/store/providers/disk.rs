//! On-disk store provider.
//!
//! Each key is one file in a flat directory. Short keys are stored under the
//! hex encoding of their bytes. Keys whose hex form would exceed
//! [`MAX_HEX_NAME_LEN`] are stored under `h-` plus the SHA-256 of the key, so
//! every name stays well below the usual 255-byte filename limit:
//!
//! ```text
//! <root>/355f2d33.px      key "5_-3"
//! <root>/h-<64 hex>.px    key "111…111_0"
//! ```
//!
//! `h` is not a hex digit, so the two forms never collide.
//!
//! Writes go to a uniquely named temp file which is then renamed over the
//! target. Rename is atomic on the same filesystem, which gives the
//! single-key atomicity the service relies on.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::store::traits::{BoxFuture, KvStore, StoreError};

/// Extension of committed entries.
const ENTRY_EXTENSION: &str = "px";

/// Extension of in-flight writes.
const TEMP_EXTENSION: &str = "tmp";

/// Longest hex stem used verbatim. Longer keys are hashed.
pub const MAX_HEX_NAME_LEN: usize = 200;

/// Prefix of hashed stems.
const HASHED_PREFIX: &str = "h-";

/// File-per-key pixel store.
pub struct DiskStore {
    root: PathBuf,
    entries: AtomicU64,
    temp_counter: AtomicU64,
}

impl DiskStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// Leftover temp files from an interrupted write are removed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        let mut entries = 0u64;
        let mut dir = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some(ENTRY_EXTENSION) => entries += 1,
                Some(TEMP_EXTENSION) => {
                    debug!(path = %path.display(), "Removing stale temp file");
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        warn!(path = %path.display(), error = %e, "Failed to remove stale temp file");
                    }
                }
                _ => {}
            }
        }

        debug!(root = %root.display(), entries, "Disk store opened");

        Ok(Self {
            root,
            entries: AtomicU64::new(entries),
            temp_counter: AtomicU64::new(0),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", file_stem(key), ENTRY_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            "{}.{}.{}.{}",
            file_stem(key),
            std::process::id(),
            n,
            TEMP_EXTENSION
        ))
    }
}

impl KvStore for DiskStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                    StoreError::Corrupt(format!("{} is not valid UTF-8", path.display()))
                }),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn put(&self, key: &str, value: String) -> BoxFuture<'_, Result<(), StoreError>> {
        let path = self.entry_path(key);
        let temp = self.temp_path(key);
        Box::pin(async move {
            let existed = tokio::fs::try_exists(&path).await?;

            tokio::fs::write(&temp, value.as_bytes()).await?;
            if let Err(e) = tokio::fs::rename(&temp, &path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(e.into());
            }

            if !existed {
                self.entries.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    let _ = self
                        .entries
                        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                            Some(n.saturating_sub(1))
                        });
                    Ok(true)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Approximate: two concurrent first writes of one key may both count it.
    /// Exact again after the next [`DiskStore::open`].
    fn entry_count(&self) -> u64 {
        self.entries.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}

/// File name stem for `key`: hex of the bytes, or a hashed stem when too long.
fn file_stem(key: &str) -> String {
    if key.len() * 2 <= MAX_HEX_NAME_LEN {
        return encode_hex(key.as_bytes());
    }
    let digest = Sha256::digest(key.as_bytes());
    format!("{}{}", HASHED_PREFIX, encode_hex(&digest))
}

/// Lowercase hex encoding.
fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
