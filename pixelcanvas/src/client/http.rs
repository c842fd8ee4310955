//! HTTP client abstraction for testability

use std::time::Duration;

use super::error::ClientError;
use crate::store::BoxFuture;

/// Default timeout for pixel service requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// `Content-Type` header, if present and valid UTF-8.
    pub content_type: Option<String>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True if the content type declares JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for async HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// Non-2xx responses are returned as `Ok`; only failures to obtain a
    /// response are errors.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, ClientError>>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, ClientError>> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self.client.get(&url).send().await.map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout { url: url.clone() }
                } else {
                    ClientError::Transport(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let body = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout { url: url.clone() }
                } else {
                    ClientError::Transport(format!("Failed to read response: {}", e))
                }
            })?;

            Ok(HttpResponse {
                status,
                content_type,
                body: body.to_vec(),
            })
        })
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Mock HTTP client returning a canned response and recording URLs.
    pub struct MockHttpClient {
        pub response: Result<HttpResponse, ClientError>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<HttpResponse, ClientError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// 200 response with a JSON body.
        pub fn json(body: &str) -> Self {
            Self::new(Ok(HttpResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: body.as_bytes().to_vec(),
            }))
        }

        pub fn last_request(&self) -> Option<String> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl AsyncHttpClient for MockHttpClient {
        fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, ClientError>> {
            self.requests.lock().unwrap().push(url.to_string());
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_client_records_requests() {
        let mock = MockHttpClient::json("{}");
        let response = mock.get("http://example.com/api?action=get").await.unwrap();
        assert!(response.is_success());
        assert_eq!(
            mock.last_request().as_deref(),
            Some("http://example.com/api?action=get")
        );
    }

    #[test]
    fn test_http_response_helpers() {
        let response = HttpResponse {
            status: 503,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: b"down".to_vec(),
        };
        assert!(!response.is_success());
        assert!(response.is_json());
        assert_eq!(response.body_text(), "down");

        let html = HttpResponse {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: Vec::new(),
        };
        assert!(!html.is_json());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::new().is_ok());
        assert!(ReqwestClient::with_timeout(Duration::from_millis(500)).is_ok());
    }
}
