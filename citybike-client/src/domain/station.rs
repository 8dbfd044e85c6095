//! Station types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station key {input:?}: {reason}")]
pub struct InvalidStationKey {
    input: String,
    reason: &'static str,
}

/// Numeric primary key of a station, as used in `/stations/{id}/` paths.
///
/// Route parameters must be made of ASCII digits only. Anything else
/// (signs, whitespace, empty strings) is rejected rather than coerced.
///
/// # Examples
///
/// ```
/// use citybike_client::domain::StationKey;
///
/// let key = StationKey::parse("12").unwrap();
/// assert_eq!(key.get(), 12);
///
/// assert!(StationKey::parse("abc").is_err());
/// assert!(StationKey::parse("-1").is_err());
/// assert!(StationKey::parse("").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationKey(u32);

impl StationKey {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse a station key from a route parameter.
    pub fn parse(s: &str) -> Result<Self, InvalidStationKey> {
        if s.is_empty() {
            return Err(InvalidStationKey {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationKey {
                input: s.to_string(),
                reason: "must contain only digits 0-9",
            });
        }

        s.parse::<u32>().map(Self).map_err(|_| InvalidStationKey {
            input: s.to_string(),
            reason: "out of range",
        })
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationKey({})", self.0)
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External station identifier that journeys refer to (e.g. `"001"`).
///
/// This is not the primary key: leading zeros are significant, so the
/// identifier is kept as the string the backend sent.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A city bicycle station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Primary key
    pub key: StationKey,
    /// Identifier referenced by journeys
    pub station_id: StationId,
    pub name: String,
    pub address: String,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
}
