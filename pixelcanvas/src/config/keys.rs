//! Typed access to individual configuration keys.
//!
//! Keys are addressed as `section.key` (e.g. `client.url`) by the CLI's
//! `config get/set/list` commands and by the file loader.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile, StoreBackend};

/// A known configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ServerListen,
    ServerStoreTimeout,
    StoreBackend,
    StoreDirectory,
    ClientUrl,
    ClientTimeout,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// Every key, in display order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ServerListen,
            ConfigKey::ServerStoreTimeout,
            ConfigKey::StoreBackend,
            ConfigKey::StoreDirectory,
            ConfigKey::ClientUrl,
            ConfigKey::ClientTimeout,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ServerListen | ConfigKey::ServerStoreTimeout => "server",
            ConfigKey::StoreBackend | ConfigKey::StoreDirectory => "store",
            ConfigKey::ClientUrl | ConfigKey::ClientTimeout => "client",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ServerListen => "listen",
            ConfigKey::ServerStoreTimeout => "store_timeout",
            ConfigKey::StoreBackend => "backend",
            ConfigKey::StoreDirectory => "directory",
            ConfigKey::ClientUrl => "url",
            ConfigKey::ClientTimeout => "timeout",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ServerListen => config.server.listen.to_string(),
            ConfigKey::ServerStoreTimeout => config.server.store_timeout.to_string(),
            ConfigKey::StoreBackend => config.store.backend.as_str().to_string(),
            ConfigKey::StoreDirectory => config.store.directory.to_string_lossy().to_string(),
            ConfigKey::ClientUrl => config.client.url.clone(),
            ConfigKey::ClientTimeout => config.client.timeout.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|d| d.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::ServerListen => {
                config.server.listen = value
                    .parse::<SocketAddr>()
                    .map_err(|e| self.invalid(value, e))?;
            }
            ConfigKey::ServerStoreTimeout => {
                config.server.store_timeout = self.parse_secs(value)?;
            }
            ConfigKey::StoreBackend => {
                config.store.backend = StoreBackend::from_config_str(value)
                    .ok_or_else(|| self.invalid(value, "expected 'memory' or 'disk'"))?;
            }
            ConfigKey::StoreDirectory => {
                if value.is_empty() {
                    return Err(self.invalid(value, "directory must not be empty"));
                }
                config.store.directory = PathBuf::from(value);
            }
            ConfigKey::ClientUrl => {
                reqwest::Url::parse(value).map_err(|e| self.invalid(value, e))?;
                config.client.url = value.to_string();
            }
            ConfigKey::ClientTimeout => {
                config.client.timeout = self.parse_secs(value)?;
            }
            ConfigKey::LoggingLevel => {
                tracing_subscriber::EnvFilter::try_new(value)
                    .map_err(|e| self.invalid(value, e))?;
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    fn parse_secs(&self, value: &str) -> Result<u64, ConfigError> {
        match value.parse::<u64>() {
            Ok(0) => Err(self.invalid(value, "must be at least 1 second")),
            Ok(secs) => Ok(secs),
            Err(e) => Err(self.invalid(value, e)),
        }
    }

    fn invalid(&self, value: &str, reason: impl fmt::Display) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
