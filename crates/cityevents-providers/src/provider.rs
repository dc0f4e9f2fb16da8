//! EventSource trait definition.
//!
//! An [`EventSource`] turns a [`Query`] into normalized [`EventRecord`]s.
//! How a source pages through its API is private to it: callers only see
//! the final, per-source deduplicated sequence.

use std::future::Future;
use std::pin::Pin;

use cityevents_core::{EventRecord, EventSourceTag, Query};

use crate::error::{ProviderError, ProviderResult};
use crate::transport::SessionFactory;

/// A boxed future for async trait methods.
///
/// Boxing keeps [`EventSource`] object-safe so the aggregator can hold a
/// heterogeneous list of sources.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An external event-discovery API.
///
/// # Implementation Notes
///
/// - Open exactly one session from `sessions` per call and drop it before returning
/// - Fetch pages sequentially; page N+1 is requested only after page N is parsed
/// - Absorb missing fields and empty pages; only structural failures are errors
/// - Deduplicate across the source's own pages before returning
pub trait EventSource: Send + Sync {
    /// Returns the short name used in logs and errors (e.g. "ticketmaster").
    fn name(&self) -> &str;

    /// Returns the tag stamped on every record this source produces.
    fn tag(&self) -> EventSourceTag;

    /// Fetches every page for `query` and returns the normalized records.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failures or when the source cannot
    /// interpret the query at all (e.g. an unknown city).
    fn fetch<'a>(
        &'a self,
        query: &'a Query,
        sessions: &'a dyn SessionFactory,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>>;
}

/// A source that always fails.
///
/// Stands in for a source that could not be configured, so the failure
/// surfaces when events are requested.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    tag: EventSourceTag,
    error: ProviderError,
}

impl ErrorSource {
    pub fn new(name: impl Into<String>, tag: EventSourceTag, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            tag,
            error,
        }
    }
}

impl EventSource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> EventSourceTag {
        self.tag
    }

    fn fetch<'a>(
        &'a self,
        _query: &'a Query,
        _sessions: &'a dyn SessionFactory,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>> {
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}
