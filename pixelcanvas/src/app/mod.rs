//! Application bootstrap and lifecycle management.
//!
//! `PixelCanvasApp` sequences startup of the pixel service:
//!
//! ```text
//! AppConfig ──► StoreConfig::open ──► PixelService ──► PixelServer::bind
//!                 (memory | disk)      (validation)     (axum, CORS)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pixelcanvas::app::{AppConfig, PixelCanvasApp};
//! use pixelcanvas::config::ConfigFile;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let app = PixelCanvasApp::start(config).await?;
//! app.run(shutdown_signal).await?;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::PixelCanvasApp;
pub use config::AppConfig;
pub use error::AppError;
