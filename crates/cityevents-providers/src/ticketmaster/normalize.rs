//! Ticketmaster page normalization.
//!
//! A search page looks like:
//!
//! ```text
//! { "_embedded": { "events": [ ... ] }, "page": { "totalPages": 3, ... } }
//! ```
//!
//! `_embedded` is omitted entirely when the search has no results.

use cityevents_core::{EventRecord, EventSourceTag};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{array_at, coordinate_from_json, parse_item, u64_at};

const SOURCE: &str = "ticketmaster";

/// Reads `page.totalPages` from a search response.
pub(crate) fn total_pages(page: &Value) -> Option<u64> {
    u64_at(page, &["page", "totalPages"])
}

/// Converts one search page into records, in server order.
///
/// Every item must carry a venue with a city name: the city is read from it.
/// If any item lacks one, the whole page yields nothing.
pub fn normalize_page(page: &Value) -> Vec<EventRecord> {
    let Some(items) = array_at(page, &["_embedded", "events"]) else {
        debug!("ticketmaster page has no events container");
        return Vec::new();
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, raw) in items.iter().enumerate() {
        let Some(event) = parse_item::<ApiEvent>(SOURCE, index, raw) else {
            continue;
        };
        match convert_event(event) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => warn!(index, "skipping ticketmaster event without a start date"),
            Err(missing) => {
                warn!(
                    index,
                    items = items.len(),
                    missing = missing.as_str(),
                    "ticketmaster event cannot be placed in a city, dropping the whole page"
                );
                return Vec::new();
            }
        }
    }
    records
}

/// What an item lacked to be placed in a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingPlace {
    /// No `_embedded.venues[0]`.
    Venue,
    /// A venue without `city.name`.
    City,
}

impl MissingPlace {
    fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::City => "venue city",
        }
    }
}

fn convert_event(event: ApiEvent) -> Result<Option<EventRecord>, MissingPlace> {
    let venue = event
        .embedded
        .and_then(|embedded| embedded.venues.into_iter().next())
        .ok_or(MissingPlace::Venue)?;
    let city = venue
        .city
        .and_then(|c| c.name)
        .ok_or(MissingPlace::City)?;

    let dates = event.dates.unwrap_or_default();
    let Some(start) = dates.start.and_then(|d| d.local_date) else {
        return Ok(None);
    };
    let end = dates
        .end
        .and_then(|d| d.local_date)
        .unwrap_or_else(|| start.clone());
    let timezone = dates.timezone.or(venue.timezone).unwrap_or_default();

    let (lat, long) = match venue.location {
        Some(location) => (
            coordinate_from_json(location.latitude.as_ref()),
            coordinate_from_json(location.longitude.as_ref()),
        ),
        None => Default::default(),
    };

    let country = venue.country.and_then(|c| c.name).unwrap_or_default();

    let record = EventRecord::new(
        event.name.unwrap_or_default(),
        start,
        city,
        country,
        EventSourceTag::Ticketmaster,
    )
    .with_end_date(end)
    .with_timezone(timezone)
    .with_venue_name(venue.name.unwrap_or_default())
    .with_venue_address(venue.address.and_then(|a| a.line1).unwrap_or_default())
    .with_coordinates(lat, long);

    Ok(Some(record))
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    name: Option<String>,
    dates: Option<ApiDates>,
    #[serde(rename = "_embedded")]
    embedded: Option<ApiEventEmbedded>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiDates {
    start: Option<ApiDate>,
    end: Option<ApiDate>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDate {
    local_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEventEmbedded {
    #[serde(default)]
    venues: Vec<ApiVenue>,
}

#[derive(Debug, Deserialize)]
struct ApiVenue {
    name: Option<String>,
    address: Option<ApiAddress>,
    location: Option<ApiLocation>,
    city: Option<ApiNamed>,
    country: Option<ApiNamed>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiAddress {
    line1: Option<String>,
}

/// Ticketmaster sends coordinates as strings; numbers are accepted too.
#[derive(Debug, Deserialize)]
struct ApiLocation {
    latitude: Option<Value>,
    longitude: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    name: Option<String>,
}
