//! Pixel Service: the HTTP boundary in front of the pixel store.
//!
//! Each request names one action (`get`, `set`, `update`, `delete`) and a
//! coordinate. The service validates the parameters and performs exactly
//! one store operation. It answers with a JSON envelope (see
//! [`crate::protocol`]).
//!
//! # Architecture
//!
//! ```text
//! HTTP request ──► http::router (axum, CORS) ──► PixelService::handle
//!                                                   │
//!                                                   ├── coord::PixelCoord  "x_y" key
//!                                                   ├── value::PixelValue  encode
//!                                                   └── Arc<dyn KvStore>   one op, bounded
//! ```
//!
//! # Status Codes
//!
//! | Outcome | Status |
//! |---------|--------|
//! | success (including get of an unpainted pixel) | 200 |
//! | missing/invalid parameter, unknown action | 400 |
//! | store failure or timeout | 500 |

mod clock;
mod config;
mod error;
mod handler;
mod http;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ServiceConfig, DEFAULT_STORE_TIMEOUT_SECS};
pub use error::{ServerError, ServiceError};
pub use handler::{PixelRequest, PixelResponse, PixelService};
pub use http::{router, PixelServer, PREFLIGHT_MAX_AGE_SECS};
