//! Event deduplication.
//!
//! Two records are duplicates when their [`IdentityKey`]s are equal. The
//! comparison is purely syntactic: the same concert titled differently by two
//! sources is not detected. A smarter strategy can be plugged in by
//! implementing [`Deduplicator`].

use std::collections::HashSet;

use crate::event::{EventRecord, IdentityKey};

/// Removes duplicate records from an ordered sequence.
///
/// Implementations must keep the first record seen for each identity and
/// preserve the relative order of the survivors.
pub trait Deduplicator: Send + Sync {
    /// Returns `events` with duplicates removed.
    fn dedup(&self, events: Vec<EventRecord>) -> Vec<EventRecord>;
}

/// Exact-match deduplication on `(event_name, start_date, end_date, city)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKeyDeduplicator;

impl Deduplicator for ExactKeyDeduplicator {
    fn dedup(&self, events: Vec<EventRecord>) -> Vec<EventRecord> {
        dedup_events(events)
    }
}

#[derive(PartialEq, Eq, Hash)]
struct OwnedKey(String, String, String, String);

impl From<IdentityKey<'_>> for OwnedKey {
    fn from(key: IdentityKey<'_>) -> Self {
        Self(
            key.event_name.to_owned(),
            key.start_date.to_owned(),
            key.end_date.to_owned(),
            key.city.to_owned(),
        )
    }
}

/// Stable, first-seen-wins deduplication on the composite identity key.
pub fn dedup_events(mut events: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen = HashSet::with_capacity(events.len());
    events.retain(|event| seen.insert(OwnedKey::from(event.identity_key())));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Coordinate, EventSourceTag};

    fn record(name: &str, start: &str, city: &str) -> EventRecord {
        EventRecord::new(name, start, city, "Italy", EventSourceTag::Ticketmaster)
    }

    #[test]
    fn empty_input() {
        assert!(dedup_events(Vec::new()).is_empty());
    }

    #[test]
    fn keeps_first_occurrence() {
        let first = record("X", "2024-01-01", "rome").with_venue_name("first");
        let second = record("X", "2024-01-01", "rome").with_venue_name("second");

        let result = dedup_events(vec![first.clone(), second]);

        assert_eq!(result, vec![first]);
    }

    #[test]
    fn preserves_order_of_survivors() {
        let events = vec![
            record("A", "2024-01-01", "rome"),
            record("B", "2024-01-01", "rome"),
            record("A", "2024-01-01", "rome"),
            record("C", "2024-01-02", "rome"),
            record("B", "2024-01-01", "rome"),
        ];

        let names: Vec<_> = dedup_events(events)
            .into_iter()
            .map(|e| e.event_name)
            .collect();

        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn every_key_component_matters() {
        let base = record("X", "2024-01-01", "rome");
        let events = vec![
            base.clone(),
            record("Y", "2024-01-01", "rome"),
            record("X", "2024-01-02", "rome"),
            base.clone().with_end_date("2024-01-03"),
            record("X", "2024-01-01", "milan"),
        ];

        assert_eq!(dedup_events(events).len(), 5);
    }

    #[test]
    fn ignores_non_key_fields() {
        let a = record("X", "2024-01-01", "rome")
            .with_coordinates(Coordinate::Known(41.9), Coordinate::Known(12.5));
        let mut b = record("X", "2024-01-01", "rome");
        b.source = EventSourceTag::PredictHq;
        b.country = "Italia".to_string();

        let result = dedup_events(vec![a.clone(), b]);
        assert_eq!(result, vec![a]);
    }

    #[test]
    fn no_key_repeats_after_dedup() {
        let names = ["a", "b", "a", "c", "b", "a", "d", "c"];
        let events: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, n)| record(n, "2024-01-01", "rome").with_venue_name(i.to_string()))
            .collect();

        let result = dedup_events(events);
        let mut keys = HashSet::new();
        for event in &result {
            assert!(keys.insert(OwnedKey::from(event.identity_key())));
        }
        // survivors carry the index of their first appearance
        let venues: Vec<_> = result.iter().map(|e| e.venue_name.as_str()).collect();
        assert_eq!(venues, vec!["0", "1", "3", "6"]);
    }

    #[test]
    fn trait_object_dispatch() {
        let dedup: Box<dyn Deduplicator> = Box::new(ExactKeyDeduplicator);
        let events = vec![record("X", "d", "c"), record("X", "d", "c")];
        assert_eq!(dedup.dedup(events).len(), 1);
    }
}
