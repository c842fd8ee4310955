//! Request handling core of the pixel service.
//!
//! [`PixelService`] turns a [`PixelRequest`] into exactly one store
//! operation and a [`PixelResponse`]. It knows nothing about HTTP framing;
//! the axum layer in `http.rs` only extracts parameters and renders the
//! result.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::clock::{Clock, SystemClock};
use super::config::ServiceConfig;
use super::error::ServiceError;
use crate::coord::PixelCoord;
use crate::protocol::{
    Action, Envelope, DELETED_MESSAGE, PARAM_ACTION, PARAM_COLOR, PARAM_X, PARAM_Y,
};
use crate::store::{BoxFuture, KvStore, StoreError};
use crate::value::{is_storable, sanitize_field, PixelValue, DEFAULT_CITY, DEFAULT_COUNTRY};

const MISSING_FOR_GET: &str = "Missing x or y for get";
const MISSING_FOR_SET: &str = "Missing x, y or color for set/update";
const MISSING_FOR_DELETE: &str = "Missing x or y for delete";

/// Parameters of one pixel request.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelRequest {
    pub action: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    /// Value of the `X-Client-Country` header.
    pub country: Option<String>,
    /// Value of the `X-Client-City` header.
    pub city: Option<String>,
}

impl PixelRequest {
    /// Build a request from decoded query parameters and location headers.
    pub fn from_query(
        mut query: HashMap<String, String>,
        country: Option<&str>,
        city: Option<&str>,
    ) -> Self {
        let mut take = |name: &str| query.remove(name).filter(|v| !v.is_empty());
        Self {
            action: take(PARAM_ACTION),
            x: take(PARAM_X),
            y: take(PARAM_Y),
            color: take(PARAM_COLOR),
            country: non_empty(country),
            city: non_empty(city),
        }
    }

    /// Request for `action` at `(x, y)`.
    pub fn new(action: &str, x: &str, y: &str) -> Self {
        Self {
            action: Some(action.to_string()),
            x: Some(x.to_string()),
            y: Some(y.to_string()),
            ..Default::default()
        }
    }

    /// Set the color parameter.
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Set the location headers.
    pub fn with_location(mut self, country: &str, city: &str) -> Self {
        self.country = Some(country.to_string());
        self.city = Some(city.to_string());
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Outcome of one request: an HTTP status code and the envelope body.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelResponse {
    pub status: u16,
    pub envelope: Envelope,
}

impl PixelResponse {
    fn ok(envelope: Envelope) -> Self {
        Self {
            status: 200,
            envelope,
        }
    }
}

impl From<ServiceError> for PixelResponse {
    fn from(err: ServiceError) -> Self {
        Self {
            status: err.status_code(),
            envelope: Envelope::error(err.to_string()),
        }
    }
}

/// Stateless pixel request handler.
///
/// Holds only the shared store, the clock and configuration; every request
/// is independent.
pub struct PixelService {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl PixelService {
    /// Create a service over `store` using the wall clock.
    pub fn new(store: Arc<dyn KvStore>, config: ServiceConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a service with an explicit clock.
    pub fn with_clock(
        store: Arc<dyn KvStore>,
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Handle one request. Never fails; errors become error envelopes.
    pub async fn handle(&self, request: PixelRequest) -> PixelResponse {
        match self.dispatch(&request).await {
            Ok(envelope) => PixelResponse::ok(envelope),
            Err(e) => {
                if e.is_validation() {
                    warn!(
                        action = ?request.action,
                        x = ?request.x,
                        y = ?request.y,
                        error = %e,
                        "Rejected pixel request"
                    );
                } else {
                    error!(action = ?request.action, error = %e, "Pixel request failed");
                }
                e.into()
            }
        }
    }

    async fn dispatch(&self, request: &PixelRequest) -> Result<Envelope, ServiceError> {
        let action_name = request
            .action
            .as_deref()
            .ok_or(ServiceError::MissingAction)?;
        let action: Action = action_name
            .parse()
            .map_err(|_| ServiceError::UnsupportedAction(action_name.to_string()))?;

        match action {
            Action::Get => {
                let coord = required_coord(request, MISSING_FOR_GET)?;
                self.get(&coord).await
            }
            Action::Set | Action::Update => {
                let color = request
                    .color
                    .as_deref()
                    .ok_or(ServiceError::MissingParameters(MISSING_FOR_SET))?;
                let coord = required_coord(request, MISSING_FOR_SET)?;
                if !is_storable(color) {
                    return Err(ServiceError::InvalidColor);
                }
                self.set(&coord, color, request).await
            }
            Action::Delete => {
                let coord = required_coord(request, MISSING_FOR_DELETE)?;
                self.delete(&coord).await
            }
        }
    }

    async fn get(&self, coord: &PixelCoord) -> Result<Envelope, ServiceError> {
        let key = coord.store_key();
        debug!(key = %key, "Getting pixel");
        let value = self.bounded("get", self.store.get(&key)).await?;
        Ok(Envelope::value(value))
    }

    async fn set(
        &self,
        coord: &PixelCoord,
        color: &str,
        request: &PixelRequest,
    ) -> Result<Envelope, ServiceError> {
        let key = coord.store_key();
        let value = PixelValue::new(
            color,
            sanitize_field(request.country.as_deref().unwrap_or(DEFAULT_COUNTRY)),
            sanitize_field(request.city.as_deref().unwrap_or(DEFAULT_CITY)),
            self.clock.now_secs(),
        )
        .encode();

        debug!(key = %key, value = %value, "Storing pixel");
        self.bounded("put", self.store.put(&key, value.clone()))
            .await?;
        Ok(Envelope::written(&key, &value))
    }

    async fn delete(&self, coord: &PixelCoord) -> Result<Envelope, ServiceError> {
        let key = coord.store_key();
        debug!(key = %key, "Deleting pixel");
        let existed = self.bounded("delete", self.store.delete(&key)).await?;
        debug!(key = %key, existed, "Pixel deleted");
        Ok(Envelope::message(DELETED_MESSAGE))
    }

    /// Run a store operation under the configured timeout.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        op: BoxFuture<'_, Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let timeout = self.config.store_timeout;
        match tokio::time::timeout(timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

fn required_coord(
    request: &PixelRequest,
    missing: &'static str,
) -> Result<PixelCoord, ServiceError> {
    match (request.x.as_deref(), request.y.as_deref()) {
        (Some(x), Some(y)) => Ok(PixelCoord::parse(x, y)?),
        _ => Err(ServiceError::MissingParameters(missing)),
    }
}
