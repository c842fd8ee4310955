//! HTTP front end for the pixel service (axum).
//!
//! One endpoint, mounted at both `/` and `/api`, carries every action via
//! the query string. GET and POST are treated alike; OPTIONS answers the
//! CORS pre-flight. The CORS header set is attached to every response by a
//! single middleware, so error paths and the 404 fallback carry it too.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use tokio::net::TcpListener;
use tracing::info;

use super::error::ServerError;
use super::handler::{PixelRequest, PixelService};
use crate::protocol::{Envelope, CITY_HEADER, COUNTRY_HEADER};

/// Pre-flight cache lifetime (24 hours).
pub const PREFLIGHT_MAX_AGE_SECS: u64 = 86_400;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-Client-Country, X-Client-City";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Build the axum router for `service`.
pub fn router(service: Arc<PixelService>) -> Router {
    Router::new()
        .route("/", get(handle_pixel).post(handle_pixel).options(preflight))
        .route(
            "/api",
            get(handle_pixel).post(handle_pixel).options(preflight),
        )
        .fallback(not_found)
        .layer(middleware::map_response(apply_cors))
        .with_state(service)
}

async fn handle_pixel(
    State(service): State<Arc<PixelService>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request = PixelRequest::from_query(
        query,
        header_text(&headers, COUNTRY_HEADER),
        header_text(&headers, CITY_HEADER),
    );

    let response = service.handle(request).await;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.envelope)).into_response()
}

async fn preflight() -> Response {
    let mut response = StatusCode::OK.into_response();
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(PREFLIGHT_MAX_AGE_SECS));
    response
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(Envelope::error("Not found"))).into_response()
}

async fn apply_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}

/// Header value as text; non-UTF-8 values count as absent.
fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Bound HTTP server for the pixel service.
///
/// # Example
///
/// ```ignore
/// let server = PixelServer::bind("127.0.0.1:8787".parse()?, service).await?;
/// println!("listening on {}", server.local_addr()?);
/// server.serve(async { tokio::signal::ctrl_c().await.ok(); }).await?;
/// ```
pub struct PixelServer {
    listener: TcpListener,
    router: Router,
}

impl PixelServer {
    /// Bind the listen socket. Port 0 picks a free port.
    pub async fn bind(addr: SocketAddr, service: Arc<PixelService>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            router: router(service),
        })
    }

    /// The bound address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(addr = %addr, "Pixel service listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(addr = %addr, "Pixel service stopped");
        Ok(())
    }
}
