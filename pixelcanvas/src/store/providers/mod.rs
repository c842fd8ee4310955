//! Store provider implementations.
//!
//! Each provider implements the `KvStore` trait. Providers are normally
//! created through [`StoreConfig::open`](crate::store::StoreConfig::open).
//!
//! # Available Providers
//!
//! - [`MemoryStore`]: in-process store using moka, lost on exit
//! - [`DiskStore`]: one file per key under a root directory

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;
