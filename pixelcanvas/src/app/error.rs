//! Application error types.

use std::fmt;

use crate::service::ServerError;
use crate::store::StoreError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to open the pixel store.
    StoreOpen(StoreError),

    /// Failed to bind or run the HTTP server.
    Server(ServerError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StoreOpen(e) => {
                write!(f, "Failed to open pixel store: {}", e)
            }
            AppError::Server(e) => {
                write!(f, "Pixel server error: {}", e)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::StoreOpen(e) => Some(e),
            AppError::Server(e) => Some(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreOpen(e)
    }
}

impl From<ServerError> for AppError {
    fn from(e: ServerError) -> Self {
        AppError::Server(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::StoreOpen(StoreError::Corrupt("bad entry".to_string()));
        assert!(err.to_string().starts_with("Failed to open pixel store"));
        assert!(err.to_string().contains("bad entry"));
    }

    #[test]
    fn test_app_error_from_store_error() {
        let store_err = StoreError::Corrupt("bad entry".to_string());
        let app_err: AppError = store_err.into();
        assert!(matches!(app_err, AppError::StoreOpen(_)));
        assert!(std::error::Error::source(&app_err).is_some());
    }
}
