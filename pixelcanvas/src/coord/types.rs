//! Coordinate types and errors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Separator between x and y in store keys (`"5_-3"`).
pub const STORE_KEY_SEPARATOR: char = '_';

/// Separator between x and y in client cache keys (`"5,-3"`).
pub const CACHE_KEY_SEPARATOR: char = ',';

/// Errors produced while parsing coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// The coordinate text was empty.
    #[error("Coordinate is empty")]
    Empty,

    /// The coordinate text is not an integer.
    #[error("Invalid coordinate '{0}': expected an integer")]
    NotAnInteger(String),
}

/// One axis of a pixel coordinate.
///
/// Coordinates are unbounded integers. They are kept as canonical decimal
/// text rather than a machine integer so that any value a client can type
/// addresses exactly one pixel.
///
/// Canonical form: no leading `+`, no leading zeros, and `-0` is `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate(String);

impl Coordinate {
    /// Parse and canonicalize a coordinate from text.
    pub fn parse(text: &str) -> Result<Self, CoordError> {
        if text.is_empty() {
            return Err(CoordError::Empty);
        }

        let (negative, digits) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoordError::NotAnInteger(text.to_string()));
        }

        let trimmed = digits.trim_start_matches('0');
        let canonical = if trimmed.is_empty() {
            "0".to_string()
        } else if negative {
            format!("-{}", trimmed)
        } else {
            trimmed.to_string()
        };

        Ok(Self(canonical))
    }

    /// The canonical decimal text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for Coordinate {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for Coordinate {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pixel address on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: Coordinate,
    pub y: Coordinate,
}

impl PixelCoord {
    /// Create a coordinate pair from already parsed axes.
    pub fn new(x: Coordinate, y: Coordinate) -> Self {
        Self { x, y }
    }

    /// Parse both axes from text.
    pub fn parse(x: &str, y: &str) -> Result<Self, CoordError> {
        Ok(Self {
            x: Coordinate::parse(x)?,
            y: Coordinate::parse(y)?,
        })
    }

    /// Key under which the service stores this pixel, e.g. `"5_-3"`.
    pub fn store_key(&self) -> String {
        format!("{}{}{}", self.x, STORE_KEY_SEPARATOR, self.y)
    }

    /// Key used by the client-side color cache, e.g. `"5,-3"`.
    pub fn cache_key(&self) -> String {
        format!("{}{}{}", self.x, CACHE_KEY_SEPARATOR, self.y)
    }
}

impl From<(i64, i64)> for PixelCoord {
    fn from((x, y): (i64, i64)) -> Self {
        Self {
            x: Coordinate::from(x),
            y: Coordinate::from(y),
        }
    }
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
