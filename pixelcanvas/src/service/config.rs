//! Pixel service configuration.

use std::time::Duration;

/// Default time budget for a single store operation (seconds).
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`PixelService`](super::PixelService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound on each store call; exceeding it is reported as a
    /// store fault (HTTP 500).
    pub store_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Set the store timeout.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}
