//! Pixel Client: typed async access to the pixel service.
//!
//! Wraps the service's single-endpoint HTTP contract into function calls
//! returning decoded [`PixelRecord`]s instead of raw envelopes.
//!
//! # Example
//!
//! ```ignore
//! use pixelcanvas::client::{ClientConfig, PixelClient};
//!
//! let client = PixelClient::from_config(&ClientConfig::new("http://127.0.0.1:8787/api"))?;
//!
//! if client.set_pixel_data(5, -3, "#ff0000").await {
//!     let record = client.get_pixel_data(5, -3).await;
//! }
//!
//! // Typed errors when the distinction matters
//! match client.fetch_pixel(5, -3).await {
//!     Ok(Some(record)) => println!("{}", record.color),
//!     Ok(None) => println!("never painted"),
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! ```

mod error;
mod http;
mod pixel;

pub use error::ClientError;
pub use http::{AsyncHttpClient, HttpResponse, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use pixel::{ClientConfig, PixelClient, PixelRecord, DEFAULT_SERVICE_URL};

#[cfg(test)]
pub use http::tests::MockHttpClient;
