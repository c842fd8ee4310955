//! Error types for the pixel client.

use thiserror::Error;

use crate::value::DecodeError;

/// Failures of a pixel client call.
///
/// The typed API (`fetch_pixel`, `put_pixel`, `remove_pixel`) returns these.
/// The compatibility API logs them and degrades to "absent" / `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The base URL could not be parsed.
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection or protocol failure before a response arrived.
    #[error("Request failed: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response is not JSON.
    #[error("Expected JSON response, got content type {content_type:?}")]
    NotJson { content_type: Option<String> },

    /// The response body is not a valid envelope.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// The service reported `status: "error"` (or an unknown status).
    #[error("Service rejected request: {0}")]
    Rejected(String),

    /// The stored value could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// True for failures that happened before the service produced a
    /// well-formed answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_)
                | ClientError::Timeout { .. }
                | ClientError::HttpStatus { .. }
                | ClientError::NotJson { .. }
                | ClientError::InvalidBody(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::HttpStatus {
            status: 400,
            body: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400: bad");

        let err = ClientError::Rejected("Missing action parameter".to_string());
        assert!(err.to_string().contains("Missing action parameter"));
    }

    #[test]
    fn test_is_transport() {
        assert!(ClientError::Transport("refused".into()).is_transport());
        assert!(ClientError::NotJson { content_type: None }.is_transport());
        assert!(!ClientError::Rejected("no".into()).is_transport());
        assert!(!ClientError::Decode(DecodeError::InvalidTimestamp("x".into())).is_transport());
    }
}
