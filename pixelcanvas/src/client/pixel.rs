//! Typed client for the pixel service.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ClientError;
use super::http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
use crate::coord::PixelCoord;
use crate::protocol::{
    Action, Envelope, WrittenPixel, PARAM_ACTION, PARAM_COLOR, PARAM_X, PARAM_Y,
};
use crate::value::PixelValue;

/// Default service endpoint.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8787/api";

/// Decoded pixel as seen by clients.
pub type PixelRecord = PixelValue;

/// Client connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service endpoint, e.g. `http://127.0.0.1:8787/api`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create a config for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the pixel service HTTP contract.
///
/// Every call performs exactly one round trip, with no retries and no
/// response caching.
///
/// Two API levels are offered:
///
/// - **Typed**: [`fetch_pixel`](Self::fetch_pixel), [`put_pixel`](Self::put_pixel),
///   [`remove_pixel`](Self::remove_pixel) return `Result<_, ClientError>` so callers
///   can tell "never painted" from "request failed".
/// - **Degrading**: [`get_pixel_data`](Self::get_pixel_data),
///   [`set_pixel_data`](Self::set_pixel_data), [`update_pixel_data`](Self::update_pixel_data),
///   [`delete_pixel_data`](Self::delete_pixel_data) log every failure and collapse it
///   to `None` / `false`.
pub struct PixelClient<C = ReqwestClient> {
    http: C,
    base_url: Url,
}

impl PixelClient<ReqwestClient> {
    /// Create a reqwest-backed client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = ReqwestClient::with_timeout(config.timeout)?;
        Self::with_http(&config.base_url, http)
    }
}

impl<C: AsyncHttpClient> PixelClient<C> {
    /// Create a client over an explicit HTTP implementation.
    pub fn with_http(base_url: &str, http: C) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { http, base_url })
    }

    /// The service endpoint.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// The underlying HTTP implementation.
    pub fn http(&self) -> &C {
        &self.http
    }

    // ---------------------------------------------------------------------
    // Typed API
    // ---------------------------------------------------------------------

    /// Read a pixel. `Ok(None)` means it was never painted (or was deleted).
    pub async fn fetch_pixel(&self, x: i64, y: i64) -> Result<Option<PixelRecord>, ClientError> {
        let url = self.request_url(Action::Get, x, y, None);
        let envelope = self.round_trip(&url).await?;

        match envelope.data {
            None => Ok(None),
            Some(Value::String(raw)) => Ok(Some(PixelValue::decode(&raw)?)),
            Some(other) => Err(ClientError::InvalidBody(format!(
                "expected string data for get, found {}",
                other
            ))),
        }
    }

    /// Paint a pixel, overwriting any previous value.
    ///
    /// Returns the key and encoded value the service stored.
    pub async fn put_pixel(
        &self,
        x: i64,
        y: i64,
        color: &str,
    ) -> Result<WrittenPixel, ClientError> {
        let url = self.request_url(Action::Set, x, y, Some(color));
        let envelope = self.round_trip(&url).await?;

        let data = envelope.data.ok_or_else(|| {
            ClientError::InvalidBody("missing data in set response".to_string())
        })?;
        serde_json::from_value(data).map_err(|e| ClientError::InvalidBody(e.to_string()))
    }

    /// Erase a pixel. Succeeds whether or not it existed.
    pub async fn remove_pixel(&self, x: i64, y: i64) -> Result<(), ClientError> {
        let url = self.request_url(Action::Delete, x, y, None);
        self.round_trip(&url).await.map(|_| ())
    }

    // ---------------------------------------------------------------------
    // Degrading API
    // ---------------------------------------------------------------------

    /// Read a pixel; any failure is logged and reported as absent.
    pub async fn get_pixel_data(&self, x: i64, y: i64) -> Option<PixelRecord> {
        match self.fetch_pixel(x, y).await {
            Ok(Some(record)) => {
                debug!(x, y, color = %record.color, "Pixel fetched");
                Some(record)
            }
            Ok(None) => {
                debug!(x, y, "Pixel has never been painted");
                None
            }
            Err(e) => {
                warn!(x, y, error = %e, "Failed to get pixel data");
                None
            }
        }
    }

    /// Paint a pixel; returns true only when the service confirms success.
    pub async fn set_pixel_data(&self, x: i64, y: i64, color: &str) -> bool {
        match self.put_pixel(x, y, color).await {
            Ok(written) => {
                debug!(key = %written.key, value = %written.value, "Pixel set");
                true
            }
            Err(e) => {
                warn!(x, y, color, error = %e, "Failed to set pixel data");
                false
            }
        }
    }

    /// Alias of [`set_pixel_data`](Self::set_pixel_data).
    pub async fn update_pixel_data(&self, x: i64, y: i64, color: &str) -> bool {
        self.set_pixel_data(x, y, color).await
    }

    /// Erase a pixel; returns true only when the service confirms success.
    pub async fn delete_pixel_data(&self, x: i64, y: i64) -> bool {
        match self.remove_pixel(x, y).await {
            Ok(()) => {
                debug!(x, y, "Pixel deleted");
                true
            }
            Err(e) => {
                warn!(x, y, error = %e, "Failed to delete pixel data");
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn request_url(&self, action: Action, x: i64, y: i64, color: Option<&str>) -> String {
        let coord = PixelCoord::from((x, y));
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair(PARAM_ACTION, action.as_str())
                .append_pair(PARAM_X, coord.x.as_str())
                .append_pair(PARAM_Y, coord.y.as_str());
            if let Some(color) = color {
                query.append_pair(PARAM_COLOR, color);
            }
        }
        url.into()
    }

    async fn round_trip(&self, url: &str) -> Result<Envelope, ClientError> {
        debug!(url, "Pixel service request");
        let response = self.http.get(url).await?;

        if !response.is_success() {
            return Err(ClientError::HttpStatus {
                status: response.status,
                body: response.body_text(),
            });
        }

        if !response.is_json() {
            return Err(ClientError::NotJson {
                content_type: response.content_type,
            });
        }

        let envelope: Envelope = serde_json::from_slice(&response.body)
            .map_err(|e| ClientError::InvalidBody(e.to_string()))?;

        if !envelope.is_success() {
            return Err(ClientError::Rejected(
                envelope.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::tests::MockHttpClient;
    use crate::client::http::HttpResponse;

    fn client(mock: MockHttpClient) -> PixelClient<MockHttpClient> {
        PixelClient::with_http("http://pixels.test/api", mock).unwrap()
    }

    #[test]
    fn test_invalid_base_url() {
        let result = PixelClient::with_http("not a url", MockHttpClient::json("{}"));
        assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_decodes_record() {
        let client = client(MockHttpClient::json(
            r##"{"status":"success","data":"#ff0000_US_Seattle_1700000000"}"##,
        ));

        let record = client.fetch_pixel(5, -3).await.unwrap().unwrap();
        assert_eq!(
            record,
            PixelRecord::new("#ff0000", "US", "Seattle", 1_700_000_000)
        );
        assert_eq!(
            client.http().last_request().as_deref(),
            Some("http://pixels.test/api?action=get&x=5&y=-3")
        );
    }

    #[tokio::test]
    async fn test_fetch_null_is_absent() {
        let client = client(MockHttpClient::json(r#"{"status":"success","data":null}"#));
        assert_eq!(client.fetch_pixel(1, 1).await, Ok(None));
        assert_eq!(client.get_pixel_data(1, 1).await, None);
    }

    #[tokio::test]
    async fn test_color_is_url_encoded() {
        let client = client(MockHttpClient::json(
            r#"{"status":"success","data":{"key":"0_0","value":"v"}}"#,
        ));
        assert!(client.set_pixel_data(0, 0, "#00ff00").await);
        assert_eq!(
            client.http().last_request().as_deref(),
            Some("http://pixels.test/api?action=set&x=0&y=0&color=%2300ff00")
        );
    }

    #[tokio::test]
    async fn test_put_returns_written_pixel() {
        let client = client(MockHttpClient::json(
            r##"{"status":"success","data":{"key":"5_-3","value":"#ff0000_US_Seattle_1700000000"}}"##,
        ));
        let written = client.put_pixel(5, -3, "#ff0000").await.unwrap();
        assert_eq!(
            written,
            WrittenPixel {
                key: "5_-3".to_string(),
                value: "#ff0000_US_Seattle_1700000000".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_put_without_data_is_invalid() {
        let client = client(MockHttpClient::json(r#"{"status":"success"}"#));
        let err = client.put_pixel(1, 1, "#000000").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidBody(_)));
        assert!(!client.set_pixel_data(1, 1, "#000000").await);
    }

    #[tokio::test]
    async fn test_update_is_alias_of_set() {
        let client = client(MockHttpClient::json(
            r#"{"status":"success","data":{"key":"2_3","value":"v"}}"#,
        ));
        assert!(client.update_pixel_data(2, 3, "#123456").await);
        assert!(client
            .http()
            .last_request()
            .unwrap()
            .contains("action=set"));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let client = client(MockHttpClient::json(
            r#"{"status":"success","message":"Deleted"}"#,
        ));
        assert!(client.delete_pixel_data(9, 9).await);
        assert!(client
            .http()
            .last_request()
            .unwrap()
            .ends_with("action=delete&x=9&y=9"));
    }

    #[tokio::test]
    async fn test_error_envelope_is_rejected() {
        let client = client(MockHttpClient::json(
            r#"{"status":"error","message":"Color must not contain '_'"}"#,
        ));
        assert_eq!(
            client.put_pixel(0, 0, "a_b").await,
            Err(ClientError::Rejected("Color must not contain '_'".to_string()))
        );
        assert!(!client.set_pixel_data(0, 0, "a_b").await);
    }

    #[tokio::test]
    async fn test_http_status_failure() {
        let client = client(MockHttpClient::new(Ok(HttpResponse {
            status: 500,
            content_type: Some("application/json".to_string()),
            body: br#"{"status":"error","message":"boom"}"#.to_vec(),
        })));

        let err = client.fetch_pixel(0, 0).await.unwrap_err();
        assert!(matches!(err, ClientError::HttpStatus { status: 500, .. }));
        assert_eq!(client.get_pixel_data(0, 0).await, None);
        assert!(!client.delete_pixel_data(0, 0).await);
    }

    #[tokio::test]
    async fn test_non_json_response() {
        let client = client(MockHttpClient::new(Ok(HttpResponse {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: b"<html></html>".to_vec(),
        })));

        let err = client.fetch_pixel(0, 0).await.unwrap_err();
        assert_eq!(
            err,
            ClientError::NotJson {
                content_type: Some("text/html".to_string())
            }
        );
        assert!(!client.set_pixel_data(0, 0, "#000000").await);
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let client = client(MockHttpClient::json("{not json"));
        let err = client.fetch_pixel(0, 0).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_degrades() {
        let client = client(MockHttpClient::new(Err(ClientError::Transport(
            "connection refused".to_string(),
        ))));

        assert!(client.fetch_pixel(0, 0).await.unwrap_err().is_transport());
        assert_eq!(client.get_pixel_data(0, 0).await, None);
        assert!(!client.set_pixel_data(0, 0, "#000000").await);
        assert!(!client.update_pixel_data(0, 0, "#000000").await);
        assert!(!client.delete_pixel_data(0, 0).await);
    }

    #[tokio::test]
    async fn test_undecodable_value() {
        let client = client(MockHttpClient::json(
            r##"{"status":"success","data":"#ff0000_US_Salt_Lake_1"}"##,
        ));
        let err = client.fetch_pixel(0, 0).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(client.get_pixel_data(0, 0).await, None);
    }

    #[tokio::test]
    async fn test_base_url_with_existing_query() {
        let client = PixelClient::with_http(
            "http://pixels.test/api?token=abc",
            MockHttpClient::json(r#"{"status":"success","data":null}"#),
        )
        .unwrap();
        client.fetch_pixel(1, 2).await.unwrap();
        assert_eq!(
            client.http().last_request().as_deref(),
            Some("http://pixels.test/api?token=abc&action=get&x=1&y=2")
        );
    }
}
