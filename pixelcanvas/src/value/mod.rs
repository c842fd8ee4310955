//! Stored pixel value encoding.
//!
//! Every pixel is persisted as a single string of four fields joined by an
//! underscore, in fixed order:
//!
//! ```text
//! color "_" country "_" city "_" timestamp
//! ```
//!
//! The format has no escaping, so none of the text fields may contain the
//! delimiter. The service rejects colors containing it and replaces it in the
//! header-derived location fields (see [`sanitize_field`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field delimiter in stored values.
pub const DELIMITER: char = '_';

/// Country recorded when the request carries no location header.
pub const DEFAULT_COUNTRY: &str = "XX";

/// City recorded when the request carries no location header.
pub const DEFAULT_CITY: &str = "Unknown";

/// Number of fields in an encoded value.
const FIELD_COUNT: usize = 4;

/// Errors decoding a stored value string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The value did not split into exactly four fields.
    #[error("Expected 4 fields in pixel value, found {found}: '{raw}'")]
    FieldCount { found: usize, raw: String },

    /// The timestamp field is not an integer.
    #[error("Invalid timestamp '{0}' in pixel value")]
    InvalidTimestamp(String),
}

/// Decoded contents of a pixel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelValue {
    /// Caller supplied color, normally `#RRGGBB`.
    pub color: String,
    /// Country of the last writer.
    pub country: String,
    /// City of the last writer.
    pub city: String,
    /// Write time in whole seconds since the Unix epoch.
    pub timestamp: i64,
}

impl PixelValue {
    /// Create a value from its four fields.
    pub fn new(
        color: impl Into<String>,
        country: impl Into<String>,
        city: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            color: color.into(),
            country: country.into(),
            city: city.into(),
            timestamp,
        }
    }

    /// Encode to the stored string form.
    ///
    /// Fields are joined as given; callers are responsible for keeping the
    /// delimiter out of them.
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}",
            self.color,
            self.country,
            self.city,
            self.timestamp,
            d = DELIMITER
        )
    }

    /// Decode a stored string.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let fields: Vec<&str> = raw.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(DecodeError::FieldCount {
                found: fields.len(),
                raw: raw.to_string(),
            });
        }

        let timestamp = fields[3]
            .parse::<i64>()
            .map_err(|_| DecodeError::InvalidTimestamp(fields[3].to_string()))?;

        Ok(Self {
            color: fields[0].to_string(),
            country: fields[1].to_string(),
            city: fields[2].to_string(),
            timestamp,
        })
    }
}

impl fmt::Display for PixelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Returns true if the text can be stored as a field without escaping.
pub fn is_storable(field: &str) -> bool {
    !field.contains(DELIMITER)
}

/// Replace delimiters in a header-derived field with spaces.
pub fn sanitize_field(field: &str) -> String {
    field.replace(DELIMITER, " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_concrete() {
        let value = PixelValue::new("#ff0000", "US", "Seattle", 1_700_000_000);
        assert_eq!(value.encode(), "#ff0000_US_Seattle_1700000000");
        assert_eq!(value.to_string(), value.encode());
    }

    #[test]
    fn test_decode_concrete() {
        let value = PixelValue::decode("#ff0000_US_Seattle_1700000000").unwrap();
        assert_eq!(value, PixelValue::new("#ff0000", "US", "Seattle", 1_700_000_000));
    }

    #[test]
    fn test_decode_defaults() {
        let value = PixelValue::decode("#000000_XX_Unknown_0").unwrap();
        assert_eq!(value.country, DEFAULT_COUNTRY);
        assert_eq!(value.city, DEFAULT_CITY);
    }

    #[test]
    fn test_delimiter_in_field_breaks_round_trip() {
        // Known limitation of the format: the extra delimiter shifts fields.
        let value = PixelValue::new("#00ff00", "US", "Salt_Lake", 42);
        let raw = value.encode();
        assert_eq!(raw, "#00ff00_US_Salt_Lake_42");

        let decoded = PixelValue::decode(&raw);
        assert_eq!(
            decoded,
            Err(DecodeError::FieldCount {
                found: 5,
                raw: raw.clone()
            })
        );
        assert!(!is_storable(&value.city));
    }

    #[test]
    fn test_decode_rejects_short_value() {
        let err = PixelValue::decode("#ffffff_US_1").unwrap_err();
        assert!(matches!(err, DecodeError::FieldCount { found: 3, .. }));
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let err = PixelValue::decode("#ffffff_US_Paris_soon").unwrap_err();
        assert_eq!(err, DecodeError::InvalidTimestamp("soon".to_string()));
    }

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("New_York"), "New York");
        assert_eq!(sanitize_field("Berlin"), "Berlin");
        assert!(is_storable(&sanitize_field("a_b_c")));
    }

    proptest! {
        #[test]
        fn prop_round_trip_without_delimiter(
            color in "[^_]*",
            country in "[^_]*",
            city in "[^_]*",
            timestamp in any::<i64>(),
        ) {
            let value = PixelValue::new(color, country, city, timestamp);
            prop_assert_eq!(PixelValue::decode(&value.encode()), Ok(value));
        }
    }
}
