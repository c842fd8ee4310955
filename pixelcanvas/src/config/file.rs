//! INI configuration file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::client::{ClientConfig, DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT_SECS};
use crate::logging::LoggingConfig;
use crate::service::{ServiceConfig, DEFAULT_STORE_TIMEOUT_SECS};
use crate::store::StoreConfig;

/// Default listen address of the service.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8787";

/// Default log level when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A key has a value of the wrong shape.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The key is not a known `section.key` name.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Disk,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Disk => "disk",
        }
    }

    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(StoreBackend::Memory),
            "disk" => Some(StoreBackend::Disk),
            _ => None,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub listen: SocketAddr,
    /// Seconds allowed per store operation.
    pub store_timeout: u64,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub directory: PathBuf,
}

/// `[client]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub url: String,
    /// Seconds allowed per HTTP request.
    pub timeout: u64,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub directory: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                listen: SocketAddr::from(([127, 0, 0, 1], 8787)),
                store_timeout: DEFAULT_STORE_TIMEOUT_SECS,
            },
            store: StoreSettings {
                backend: StoreBackend::Memory,
                directory: default_store_directory(),
            },
            client: ClientSettings {
                url: DEFAULT_SERVICE_URL.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                level: DEFAULT_LOG_LEVEL.to_string(),
                directory: None,
            },
        }
    }
}

impl ConfigFile {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories. Unset keys are omitted.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        ini.write_to_file(path).map_err(io_err)
    }

    /// Store provider selected by this configuration.
    pub fn store_config(&self) -> StoreConfig {
        match self.store.backend {
            StoreBackend::Memory => StoreConfig::Memory,
            StoreBackend::Disk => StoreConfig::Disk {
                directory: self.store.directory.clone(),
            },
        }
    }

    /// Service settings.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default().with_store_timeout(Duration::from_secs(self.server.store_timeout))
    }

    /// Client settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.client.url.clone())
            .with_timeout(Duration::from_secs(self.client.timeout))
    }

    /// Logging settings.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            directory: self.logging.directory.clone(),
            ..Default::default()
        }
    }
}

/// Path of the configuration file (`<config dir>/pixelcanvas/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pixelcanvas")
        .join("config.ini")
}

/// Default root of the disk store (`<data dir>/pixelcanvas/pixels`).
pub fn default_store_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pixelcanvas")
        .join("pixels")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.server.listen.to_string(), DEFAULT_LISTEN);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.client.url, "http://127.0.0.1:8787/api");
        assert_eq!(config.logging.directory, None);
        assert_eq!(config.store_config(), StoreConfig::Memory);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(
            &path,
            "[server]\nlisten = 0.0.0.0:9000\n\n[store]\nbackend = disk\ndirectory = /srv/pixels\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.server.listen.port(), 9000);
        assert_eq!(config.server.store_timeout, DEFAULT_STORE_TIMEOUT_SECS);
        assert_eq!(
            config.store_config(),
            StoreConfig::Disk {
                directory: PathBuf::from("/srv/pixels")
            }
        );
    }

    #[test]
    fn test_load_rejects_invalid_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[client]\ntimeout = soon\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("client.timeout"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.client.url = "http://pixels.example/api".to_string();
        config.client.timeout = 3;
        config.logging.directory = Some(temp.path().join("logs"));
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_derived_configs() {
        let mut config = ConfigFile::default();
        config.server.store_timeout = 2;
        config.client.timeout = 4;
        config.logging.level = "debug".to_string();

        assert_eq!(config.service_config().store_timeout, Duration::from_secs(2));
        assert_eq!(config.client_config().timeout, Duration::from_secs(4));
        assert_eq!(config.logging_config().level, "debug");
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::from_config_str("Disk"), Some(StoreBackend::Disk));
        assert_eq!(StoreBackend::from_config_str("redis"), None);
    }
}
