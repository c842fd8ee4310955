//! Configuration file support.
//!
//! Settings live in an INI file at `<config dir>/pixelcanvas/config.ini`.
//! A missing file means all defaults; CLI flags override file values.
//!
//! ```ini
//! [server]
//! listen = 127.0.0.1:8787
//! store_timeout = 10
//!
//! [store]
//! backend = disk
//! directory = /var/lib/pixelcanvas
//!
//! [client]
//! url = http://127.0.0.1:8787/api
//! timeout = 10
//!
//! [logging]
//! level = info
//! directory = /var/log/pixelcanvas
//! ```

mod file;
mod keys;

pub use file::{
    config_file_path, default_store_directory, ClientSettings, ConfigError, ConfigFile,
    LoggingSettings, ServerSettings, StoreBackend, StoreSettings, DEFAULT_LISTEN,
    DEFAULT_LOG_LEVEL,
};
pub use keys::ConfigKey;
