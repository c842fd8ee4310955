//! Client-side canvas session state.
//!
//! A [`CanvasSession`] owns everything a presentation layer needs to keep
//! between calls for one running client. That is the pixel-color cache,
//! the selected pixel and its server record, and the drawing color. It is
//! an ordinary value; nothing here is process-global.
//!
//! # Cache semantics
//!
//! The color cache is write-through and never refreshed on its own:
//!
//! - [`set_pixel_color`](CanvasSession::set_pixel_color) updates the cache
//!   *before* the server confirms, and keeps the new color even if the
//!   write fails.
//! - Writes by other clients are never seen until
//!   [`refresh_pixel`](CanvasSession::refresh_pixel) re-issues a get for
//!   that coordinate.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::client::{AsyncHttpClient, ClientError, PixelClient, PixelRecord, ReqwestClient};
use crate::coord::PixelCoord;

/// Color shown for pixels absent from the cache.
pub const BLANK_COLOR: &str = "#ffffff";

/// Initial drawing color.
pub const DEFAULT_DRAWING_COLOR: &str = "#000000";

/// Combined local and server view of one pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelInfo {
    /// Server color when known, otherwise the cached (or blank) color.
    pub color: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub timestamp: Option<i64>,
}

/// State of one client session.
pub struct CanvasSession<C = ReqwestClient> {
    client: PixelClient<C>,
    pixels: HashMap<String, String>,
    selected: Option<(i64, i64)>,
    selected_data: Option<PixelRecord>,
    drawing_color: String,
}

impl<C: AsyncHttpClient> CanvasSession<C> {
    /// Start a session over `client` with an empty cache.
    pub fn new(client: PixelClient<C>) -> Self {
        Self {
            client,
            pixels: HashMap::new(),
            selected: None,
            selected_data: None,
            drawing_color: DEFAULT_DRAWING_COLOR.to_string(),
        }
    }

    /// The underlying pixel client.
    pub fn client(&self) -> &PixelClient<C> {
        &self.client
    }

    /// Paint a pixel: cache first, then persist. Returns the server outcome.
    pub async fn set_pixel_color(&mut self, x: i64, y: i64, color: &str) -> bool {
        let key = cache_key(x, y);
        debug!(key = %key, color, "Caching pixel color");
        self.pixels.insert(key, color.to_string());

        let saved = self.client.set_pixel_data(x, y, color).await;
        if !saved {
            warn!(x, y, color, "Pixel kept locally but not saved to server");
        }
        saved
    }

    /// Cached color of a pixel, or [`BLANK_COLOR`].
    pub fn pixel_color(&self, x: i64, y: i64) -> &str {
        self.pixels
            .get(&cache_key(x, y))
            .map(String::as_str)
            .unwrap_or(BLANK_COLOR)
    }

    /// Number of cached pixels.
    pub fn cached_pixels(&self) -> usize {
        self.pixels.len()
    }

    /// Select a pixel and load its server record.
    pub async fn select_pixel(&mut self, x: i64, y: i64) -> Option<&PixelRecord> {
        self.selected = Some((x, y));
        self.selected_data = self.client.get_pixel_data(x, y).await;
        self.selected_data.as_ref()
    }

    /// Clear the selection. The last loaded record stays available.
    pub fn deselect_pixel(&mut self) {
        self.selected = None;
    }

    /// Currently selected coordinate.
    pub fn selected_pixel(&self) -> Option<(i64, i64)> {
        self.selected
    }

    /// Record loaded by the last [`select_pixel`](Self::select_pixel).
    pub fn selected_pixel_data(&self) -> Option<&PixelRecord> {
        self.selected_data.as_ref()
    }

    /// Change the drawing color.
    pub fn set_drawing_color(&mut self, color: impl Into<String>) {
        self.drawing_color = color.into();
    }

    /// Current drawing color.
    pub fn drawing_color(&self) -> &str {
        &self.drawing_color
    }

    /// Cached color merged with the server record for a pixel.
    pub async fn pixel_info(&self, x: i64, y: i64) -> PixelInfo {
        let cached = self.pixel_color(x, y).to_string();
        match self.client.get_pixel_data(x, y).await {
            Some(record) => PixelInfo {
                color: record.color,
                country: Some(record.country),
                city: Some(record.city),
                timestamp: Some(record.timestamp),
            },
            None => PixelInfo {
                color: cached,
                country: None,
                city: None,
                timestamp: None,
            },
        }
    }

    /// Re-read a pixel from the server and reconcile the cache entry.
    ///
    /// On failure the cache is left untouched.
    pub async fn refresh_pixel(
        &mut self,
        x: i64,
        y: i64,
    ) -> Result<Option<PixelRecord>, ClientError> {
        let key = cache_key(x, y);
        let record = self.client.fetch_pixel(x, y).await?;
        match &record {
            Some(r) => {
                self.pixels.insert(key, r.color.clone());
            }
            None => {
                self.pixels.remove(&key);
            }
        }
        Ok(record)
    }
}

fn cache_key(x: i64, y: i64) -> String {
    PixelCoord::from((x, y)).cache_key()
}
