//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use pixelcanvas::client::ClientConfig;
use pixelcanvas::config::{ConfigFile, StoreBackend};

/// Store backend selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (contents are lost on exit)
    Memory,
    /// One file per pixel under the data directory
    Disk,
}

impl From<StoreType> for StoreBackend {
    fn from(store: StoreType) -> Self {
        match store {
            StoreType::Memory => StoreBackend::Memory,
            StoreType::Disk => StoreBackend::Disk,
        }
    }
}

/// Resolve client settings: `--url` takes precedence over the config file.
pub fn resolve_client(cli_url: Option<String>, config: &ConfigFile) -> ClientConfig {
    let mut client = config.client_config();
    if let Some(url) = cli_url {
        client.base_url = url;
    }
    client
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_client_prefers_cli() {
        let config = ConfigFile::default();
        let client = resolve_client(Some("http://pixels.example/api".to_string()), &config);
        assert_eq!(client.base_url, "http://pixels.example/api");

        let client = resolve_client(None, &config);
        assert_eq!(client.base_url, config.client.url);
    }

    #[test]
    fn test_store_type_maps_to_backend() {
        assert_eq!(StoreBackend::from(StoreType::Disk), StoreBackend::Disk);
        assert_eq!(StoreBackend::from(StoreType::Memory), StoreBackend::Memory);
    }
}
