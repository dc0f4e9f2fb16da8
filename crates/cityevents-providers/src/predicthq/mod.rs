//! PredictHQ events API source.
//!
//! A fetch first resolves the query's city to a PredictHQ place id, then
//! searches events scoped to that place, 50 per page. Pagination is cursor
//! based: each response names the URL of the next page.

mod config;
mod normalize;
mod source;

pub use config::{PageCountPolicy, PredictHqConfig};
pub use normalize::normalize_page;
pub use source::{PAGE_SIZE, PredictHqSource};
