//! CLI error types.

use pixelcanvas::app::AppError;
use pixelcanvas::client::ClientError;
use pixelcanvas::config::ConfigError;
use pixelcanvas::logging::LoggingError;
use thiserror::Error;

/// Errors surfaced by CLI commands. Any of these exits with status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("Failed to create Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to install Ctrl+C handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
