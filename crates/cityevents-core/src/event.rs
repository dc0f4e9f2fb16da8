//! Event record types.
//!
//! This module provides the canonical, source-agnostic event shape:
//! - [`EventRecord`]: one event, flattened to eleven always-present fields
//! - [`Coordinate`]: a latitude or longitude that may be unknown
//! - [`EventSourceTag`]: which upstream API produced a record
//! - [`IdentityKey`]: the composite key used for deduplication

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialized placeholder for an unknown coordinate.
///
/// Consumers of the JSON output expect a single space rather than `null`.
pub const UNKNOWN_COORDINATE: &str = " ";

/// The upstream API an [`EventRecord`] was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSourceTag {
    /// Ticketmaster Discovery API (offset pagination).
    Ticketmaster,
    /// PredictHQ Events API (cursor pagination).
    #[serde(rename = "PredictHQ")]
    PredictHq,
}

impl EventSourceTag {
    /// Returns the tag as written in the output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ticketmaster => "Ticketmaster",
            Self::PredictHq => "PredictHQ",
        }
    }
}

impl fmt::Display for EventSourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic coordinate component (latitude or longitude).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Coordinate {
    /// A known value in decimal degrees.
    Known(f64),
    /// The source did not report this coordinate.
    #[default]
    Unknown,
}

impl Coordinate {
    /// Parses a coordinate from its textual form.
    ///
    /// Anything that is not a finite number becomes [`Coordinate::Unknown`].
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Known(value),
            _ => Self::Unknown,
        }
    }

    /// Returns true if the coordinate is unknown.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Known(value)
        } else {
            Self::Unknown
        }
    }
}

impl From<Option<f64>> for Coordinate {
    fn from(value: Option<f64>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => serializer.serialize_f64(*value),
            Self::Unknown => serializer.serialize_str(UNKNOWN_COORDINATE),
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordinateVisitor;

        impl Visitor<'_> for CoordinateVisitor {
            type Value = Coordinate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a numeric string, or a blank placeholder")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Coordinate, E> {
                Ok(Coordinate::from(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Coordinate, E> {
                Ok(Coordinate::from(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Coordinate, E> {
                Ok(Coordinate::from(value as f64))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Coordinate, E> {
                Ok(Coordinate::parse(value))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Coordinate, E> {
                Ok(Coordinate::Unknown)
            }
        }

        deserializer.deserialize_any(CoordinateVisitor)
    }
}

/// The composite identity of an event: `(event_name, start_date, end_date, city)`.
///
/// Comparison is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityKey<'a> {
    pub event_name: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub city: &'a str,
}

/// A single event normalized from any source.
///
/// Every field is always present. Text fields the source did not report are
/// empty strings; unknown coordinates serialize as [`UNKNOWN_COORDINATE`].
/// Dates are kept verbatim (ISO 8601 date or date-time) so that identity
/// comparison matches what the source reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The event title.
    pub event_name: String,
    /// Start date or date-time.
    pub start_date: String,
    /// End date or date-time; equals `start_date` when the source has none.
    pub end_date: String,
    /// IANA timezone, empty when unknown.
    pub timezone: String,
    /// Venue name, empty when unknown.
    pub venue_name: String,
    /// Venue street address, empty when unknown.
    pub venue_address: String,
    /// Venue latitude.
    pub venue_lat: Coordinate,
    /// Venue longitude.
    pub venue_long: Coordinate,
    /// City the event takes place in.
    pub city: String,
    /// Country the event takes place in.
    pub country: String,
    /// Which API produced this record.
    pub source: EventSourceTag,
}

impl EventRecord {
    /// Creates a record with the required fields; the rest take their defaults.
    pub fn new(
        event_name: impl Into<String>,
        start_date: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        source: EventSourceTag,
    ) -> Self {
        let start_date = start_date.into();
        Self {
            event_name: event_name.into(),
            end_date: start_date.clone(),
            start_date,
            timezone: String::new(),
            venue_name: String::new(),
            venue_address: String::new(),
            venue_lat: Coordinate::Unknown,
            venue_long: Coordinate::Unknown,
            city: city.into(),
            country: country.into(),
            source,
        }
    }

    /// Builder method to set the end date.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = end_date.into();
        self
    }

    /// Builder method to set the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Builder method to set the venue name.
    pub fn with_venue_name(mut self, name: impl Into<String>) -> Self {
        self.venue_name = name.into();
        self
    }

    /// Builder method to set the venue address.
    pub fn with_venue_address(mut self, address: impl Into<String>) -> Self {
        self.venue_address = address.into();
        self
    }

    /// Builder method to set the venue coordinates.
    pub fn with_coordinates(mut self, lat: Coordinate, long: Coordinate) -> Self {
        self.venue_lat = lat;
        self.venue_long = long;
        self
    }

    /// Returns the key used to detect duplicates.
    pub fn identity_key(&self) -> IdentityKey<'_> {
        IdentityKey {
            event_name: &self.event_name,
            start_date: &self.start_date,
            end_date: &self.end_date,
            city: &self.city,
        }
    }
}
