//! Shared setup for commands: configuration, logging and the runtime.

use pixelcanvas::config::ConfigFile;
use pixelcanvas::logging::{init_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Loaded configuration plus the process-wide logging guard.
pub struct CliRunner {
    config: ConfigFile,
    logging: LoggingGuard,
}

impl CliRunner {
    /// Load the config file and install logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let logging = init_logging(&config.logging_config())?;
        Ok(Self {
            config,
            logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = pixelcanvas::VERSION,
            command,
            file_logging = self.logging.has_file_output(),
            "PixelCanvas starting"
        );
    }

    /// Multi-threaded runtime for async commands.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }
}
