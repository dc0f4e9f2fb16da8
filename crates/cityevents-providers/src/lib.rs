//! Event sources and multi-source aggregation.
//!
//! This crate fetches events for a [`Query`](cityevents_core::Query) from
//! external discovery APIs:
//!
//! - [`EventSource`] - The trait every API adapter implements
//! - [`TicketmasterSource`] - Offset-paginated Discovery API adapter
//! - [`PredictHqSource`] - Place-scoped, cursor-paginated adapter
//! - [`EventAggregator`] - Runs the sources concurrently and merges their output
//! - [`ProviderError`] - Error types for source operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │  Ticketmaster    │      │    PredictHQ     │
//! └────────┬─────────┘      └────────┬─────────┘
//!          │  pages (offset)         │  place lookup, pages (next)
//!          ▼                         ▼
//! ┌──────────────────┐      ┌──────────────────┐
//! │TicketmasterSource│      │ PredictHqSource  │
//! └────────┬─────────┘      └────────┬─────────┘
//!          │ dedup                   │ dedup
//!          └───────────┬─────────────┘
//!                      ▼
//!              ┌───────────────┐
//!              │EventAggregator│ concat, dedup
//!              └───────┬───────┘
//!                      ▼
//!               Vec<EventRecord>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cityevents_providers::{EventAggregator, HttpConfig};
//!
//! let aggregator = EventAggregator::from_configs(tm_config, phq_config, HttpConfig::default())?;
//! let events = aggregator.get_events(&query)?;
//! ```

pub mod aggregate;
pub mod error;
mod normalize;
pub mod predicthq;
pub mod provider;
pub mod ticketmaster;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use aggregate::EventAggregator;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use predicthq::{PageCountPolicy, PredictHqConfig, PredictHqSource};
pub use provider::{BoxFuture, ErrorSource, EventSource};
pub use ticketmaster::{TicketmasterConfig, TicketmasterSource};
pub use transport::{
    HttpConfig, HttpSession, JsonReply, JsonRequest, ReqwestSessionFactory, SessionFactory,
};
