//! Core types: event records, queries, deduplication, tracing

pub mod dedup;
pub mod event;
pub mod query;
pub mod tracing;

pub use dedup::{Deduplicator, ExactKeyDeduplicator, dedup_events};
pub use event::{Coordinate, EventRecord, EventSourceTag, IdentityKey, UNKNOWN_COORDINATE};
pub use query::{ISO_DATE_FORMAT, Query, QueryError};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
