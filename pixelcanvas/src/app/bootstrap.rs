//! Application bootstrap implementation.
//!
//! `PixelCanvasApp` opens the store before anything can accept requests,
//! so a bad store directory fails startup instead of the first write.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::service::{PixelServer, PixelService};

/// Pixel service application with its store and bound listener.
///
/// # Example
///
/// ```ignore
/// use pixelcanvas::app::{AppConfig, PixelCanvasApp};
///
/// let app = PixelCanvasApp::start(config).await?;
/// println!("listening on {}", app.local_addr()?);
///
/// // Serve until Ctrl+C
/// app.run(async { tokio::signal::ctrl_c().await.ok(); }).await?;
/// ```
pub struct PixelCanvasApp {
    service: Arc<PixelService>,
    server: PixelServer,
    config: AppConfig,
}

impl PixelCanvasApp {
    /// Start the application.
    ///
    /// 1. Opens the configured store
    /// 2. Creates the pixel service over it
    /// 3. Binds the listen socket
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the address
    /// cannot be bound.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let store = config.store.open().await?;
        info!(
            backend = config.store.backend_name(),
            store_timeout_ms = config.service.store_timeout.as_millis() as u64,
            "Starting pixel service"
        );

        let service = Arc::new(PixelService::new(store, config.service.clone()));
        Self::start_with_service(config, service).await
    }

    /// Start with an already constructed service (custom clock or store).
    pub async fn start_with_service(
        config: AppConfig,
        service: Arc<PixelService>,
    ) -> Result<Self, AppError> {
        let server = PixelServer::bind(config.listen, Arc::clone(&service)).await?;

        Ok(Self {
            service,
            server,
            config,
        })
    }

    /// The bound listen address.
    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        Ok(self.server.local_addr()?)
    }

    /// The pixel service.
    pub fn service(&self) -> Arc<PixelService> {
        Arc::clone(&self.service)
    }

    /// Configuration the application was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.server.serve(shutdown).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::PixelCoord;
    use crate::store::StoreConfig;
    use tempfile::TempDir;

    fn local_config(store: StoreConfig) -> AppConfig {
        AppConfig::new(store, "127.0.0.1:0".parse().unwrap())
    }

    #[tokio::test]
    async fn test_start_memory_binds_free_port() {
        let app = PixelCanvasApp::start(local_config(StoreConfig::Memory))
            .await
            .unwrap();
        assert_ne!(app.local_addr().unwrap().port(), 0);
        assert_eq!(app.service().store().name(), "memory");
    }

    #[tokio::test]
    async fn test_start_disk_sees_existing_pixels() {
        let temp = TempDir::new().unwrap();
        let store = StoreConfig::Disk {
            directory: temp.path().to_path_buf(),
        };

        let existing = store.open().await.unwrap();
        existing
            .put(
                &PixelCoord::from((1, 1)).store_key(),
                "#ff0000_US_Austin_1700000000".to_string(),
            )
            .await
            .unwrap();
        drop(existing);

        let app = PixelCanvasApp::start(local_config(store)).await.unwrap();
        assert_eq!(app.service().store().entry_count(), 1);
    }

    #[tokio::test]
    async fn test_start_fails_when_store_path_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let result = PixelCanvasApp::start(local_config(StoreConfig::Disk { directory: file })).await;
        assert!(matches!(result, Err(AppError::StoreOpen(_))));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let app = PixelCanvasApp::start(local_config(StoreConfig::Memory))
            .await
            .unwrap();
        app.run(async {}).await.unwrap();
    }
}
