//! Pixel coordinate module
//!
//! Provides the canonical representation of canvas coordinates and the two
//! key formats derived from them: the service-side store key (`"x_y"`) and
//! the client-side cache key (`"x,y"`).

mod types;

pub use types::{Coordinate, CoordError, PixelCoord, CACHE_KEY_SEPARATOR, STORE_KEY_SEPARATOR};
