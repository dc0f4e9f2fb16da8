//! PredictHQ page normalization.
//!
//! Events pages carry `count`, `next` and `results`. Items have no city of
//! their own; city and country are echoed from the query.

use cityevents_core::{Coordinate, EventRecord, EventSourceTag, Query};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{array_at, coordinate_from_json, parse_item, u64_at};

const SOURCE: &str = "predicthq";

/// Reads the total result `count` from an events page.
pub(crate) fn event_count(page: &Value) -> Option<u64> {
    u64_at(page, &["count"])
}

/// Reads the `next` page URL, if the server supplied one.
pub(crate) fn next_url(page: &Value) -> Option<&str> {
    page.get("next")
        .and_then(Value::as_str)
        .filter(|next| !next.trim().is_empty())
}

/// Reads `results[0].id` from a places response; ids may be strings or numbers.
pub(crate) fn first_place_id(places: &Value) -> Option<String> {
    let first = array_at(places, &["results"])?.first()?;
    match first.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Converts one events page into records, in server order.
pub fn normalize_page(page: &Value, query: &Query) -> Vec<EventRecord> {
    let Some(items) = array_at(page, &["results"]) else {
        debug!("predicthq page has no results container");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let event = parse_item::<ApiEvent>(SOURCE, index, raw)?;
            let record = convert_event(event, query);
            if record.is_none() {
                warn!(index, "skipping predicthq event without a start date");
            }
            record
        })
        .collect()
}

fn convert_event(event: ApiEvent, query: &Query) -> Option<EventRecord> {
    let start = event.start?;
    let end = event.end.unwrap_or_else(|| start.clone());

    let (venue_name, venue_address) = match event.entities.into_iter().next() {
        Some(entity) => (
            entity.name.unwrap_or_default(),
            entity
                .formatted_address
                .map(|address| address.replace('\n', ", "))
                .unwrap_or_default(),
        ),
        None => Default::default(),
    };

    // GeoJSON order: [longitude, latitude].
    let point = event.location.unwrap_or_default();
    let lat = coordinate_at(&point, 1);
    let long = coordinate_at(&point, 0);

    let record = EventRecord::new(
        event.title.unwrap_or_default(),
        start,
        query.city(),
        query.country(),
        EventSourceTag::PredictHq,
    )
    .with_end_date(end)
    .with_timezone(event.timezone.unwrap_or_default())
    .with_venue_name(venue_name)
    .with_venue_address(venue_address)
    .with_coordinates(lat, long);

    Some(record)
}

fn coordinate_at(point: &[Value], index: usize) -> Coordinate {
    coordinate_from_json(point.get(index))
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    timezone: Option<String>,
    #[serde(default)]
    entities: Vec<ApiEntity>,
    location: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiEntity {
    name: Option<String>,
    formatted_address: Option<String>,
}
