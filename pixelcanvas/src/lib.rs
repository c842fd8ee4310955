//! PixelCanvas - a shared, unbounded pixel canvas
//!
//! This library provides the pixel service (an HTTP endpoint in front of a
//! key-value store), the client that talks to it, and the per-session canvas
//! state a presentation layer builds on.
//!
//! # Modules
//!
//! - [`coord`] / [`value`]: pixel keys and the stored value format
//! - [`store`]: key-value persistence (memory or disk)
//! - [`service`]: request validation, dispatch and the HTTP server
//! - [`client`]: HTTP client for the service
//! - [`canvas`]: client-side session state (color cache, selection)
//! - [`app`], [`config`], [`logging`]: bootstrap and ambient setup

pub mod app;
pub mod canvas;
pub mod client;
pub mod config;
pub mod coord;
pub mod logging;
pub mod protocol;
pub mod service;
pub mod store;
pub mod value;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version string shown in banners.
pub fn version_string() -> String {
    format!("PixelCanvas v{}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_names_crate() {
        let version = version_string();
        assert!(version.starts_with("PixelCanvas v"));
        assert!(version.ends_with(VERSION));
    }
}
