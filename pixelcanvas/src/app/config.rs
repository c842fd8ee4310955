//! Application configuration for PixelCanvasApp.
//!
//! `AppConfig` combines everything needed to bring up the pixel service:
//! the store backend, the service settings and the listen address.

use std::net::SocketAddr;

use crate::config::ConfigFile;
use crate::service::ServiceConfig;
use crate::store::StoreConfig;

/// Top-level configuration passed to `PixelCanvasApp::start()`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Store backend.
    pub store: StoreConfig,

    /// Service settings (store timeout).
    pub service: ServiceConfig,

    /// Address to listen on. Port 0 picks a free port.
    pub listen: SocketAddr,
}

impl AppConfig {
    /// Create a config with default service settings.
    pub fn new(store: StoreConfig, listen: SocketAddr) -> Self {
        Self {
            store,
            service: ServiceConfig::default(),
            listen,
        }
    }

    /// Build from a loaded configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            store: config.store_config(),
            service: config.service_config(),
            listen: config.server.listen,
        }
    }

    /// Set the service settings.
    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::config::StoreBackend;

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.server.listen = "0.0.0.0:9000".parse().unwrap();
        file.server.store_timeout = 3;
        file.store.backend = StoreBackend::Disk;
        file.store.directory = PathBuf::from("/srv/pixels");

        let config = AppConfig::from_config_file(&file);
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.service.store_timeout, Duration::from_secs(3));
        assert_eq!(
            config.store,
            StoreConfig::Disk {
                directory: PathBuf::from("/srv/pixels")
            }
        );
    }

    #[test]
    fn test_new_uses_default_service() {
        let config = AppConfig::new(StoreConfig::Memory, "127.0.0.1:0".parse().unwrap());
        assert_eq!(config.service, ServiceConfig::default());
    }
}
