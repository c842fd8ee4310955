//! Error types for the pixel service.

use std::net::SocketAddr;

use thiserror::Error;

use crate::coord::CoordError;
use crate::store::StoreError;

/// Failures while handling a single pixel request.
///
/// The `Display` text of each variant is sent to the caller verbatim as the
/// envelope `message`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No `action` query parameter.
    #[error("Missing action parameter")]
    MissingAction,

    /// Required parameters for the resolved action are missing.
    #[error("{0}")]
    MissingParameters(&'static str),

    /// A coordinate is not an integer.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordError),

    /// The color would corrupt the stored value.
    #[error("Color must not contain '_'")]
    InvalidColor,

    /// The action is not one of get, set, update, delete.
    #[error("Invalid action. Use: set, get, delete, update")]
    UnsupportedAction(String),

    /// The store failed or timed out.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Store(_) => 500,
            _ => 400,
        }
    }

    /// True for caller mistakes as opposed to server faults.
    pub fn is_validation(&self) -> bool {
        self.status_code() == 400
    }
}

/// Failures starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The server loop failed.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
