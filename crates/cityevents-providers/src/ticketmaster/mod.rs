//! Ticketmaster Discovery API source.
//!
//! Events are searched by city, country code and date window, 200 per page.
//! Pagination is offset based: the first page reports how many pages exist
//! and the rest are requested by number.
//!
//! # Example
//!
//! ```ignore
//! use cityevents_providers::ticketmaster::{TicketmasterConfig, TicketmasterSource};
//!
//! let config = TicketmasterConfig::new(TicketmasterConfig::DEFAULT_EVENTS_URL, api_key)?;
//! let source = TicketmasterSource::new(config)?;
//! let events = source.fetch(&query, &sessions).await?;
//! ```

mod config;
mod normalize;
mod source;

pub use config::TicketmasterConfig;
pub use normalize::normalize_page;
pub use source::{PAGE_SIZE, TicketmasterSource};
