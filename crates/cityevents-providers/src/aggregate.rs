//! Multi-source aggregation.
//!
//! [`EventAggregator`] runs every configured [`EventSource`] concurrently,
//! concatenates their records in registration order and removes duplicates
//! across sources. Any source failure fails the whole call; partial results
//! are never returned.

use std::sync::Arc;
use std::time::Duration;

use cityevents_core::{Deduplicator, EventRecord, EventSourceTag, ExactKeyDeduplicator, Query};
use futures_util::future::try_join_all;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::predicthq::{PredictHqConfig, PredictHqSource};
use crate::provider::{ErrorSource, EventSource};
use crate::ticketmaster::{TicketmasterConfig, TicketmasterSource};
use crate::transport::{HttpConfig, ReqwestSessionFactory, SessionFactory};

/// Runs event sources and merges their results.
pub struct EventAggregator {
    sources: Vec<Box<dyn EventSource>>,
    sessions: Arc<dyn SessionFactory>,
    source_timeout: Duration,
    deduplicator: Box<dyn Deduplicator>,
}

impl EventAggregator {
    /// Creates an aggregator with no sources.
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            sources: Vec::new(),
            sessions,
            source_timeout: Duration::from_secs(HttpConfig::DEFAULT_SOURCE_TIMEOUT_SECS),
            deduplicator: Box::new(ExactKeyDeduplicator),
        }
    }

    /// Creates the standard aggregator: Ticketmaster first, then PredictHQ,
    /// over a `reqwest` transport.
    ///
    /// A source whose configuration does not validate is replaced by an
    /// [`ErrorSource`], so the problem is reported when events are fetched.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `http` is invalid.
    pub fn from_configs(
        ticketmaster: TicketmasterConfig,
        predicthq: PredictHqConfig,
        http: HttpConfig,
    ) -> ProviderResult<Self> {
        http.validate().map_err(ProviderError::configuration)?;
        let source_timeout = http.source_timeout;

        let ticketmaster: Box<dyn EventSource> = match TicketmasterSource::new(ticketmaster) {
            Ok(source) => Box::new(source),
            Err(e) => {
                warn!(source = TicketmasterSource::NAME, error = %e, "source is misconfigured");
                Box::new(ErrorSource::new(
                    TicketmasterSource::NAME,
                    EventSourceTag::Ticketmaster,
                    e,
                ))
            }
        };
        let predicthq: Box<dyn EventSource> = match PredictHqSource::new(predicthq) {
            Ok(source) => Box::new(source),
            Err(e) => {
                warn!(source = PredictHqSource::NAME, error = %e, "source is misconfigured");
                Box::new(ErrorSource::new(
                    PredictHqSource::NAME,
                    EventSourceTag::PredictHq,
                    e,
                ))
            }
        };

        Ok(Self::new(Arc::new(ReqwestSessionFactory::new(http)))
            .with_boxed_source(ticketmaster)
            .with_boxed_source(predicthq)
            .with_source_timeout(source_timeout))
    }

    /// Builder method to append a source. Earlier sources win ties in deduplication.
    pub fn with_source(self, source: impl EventSource + 'static) -> Self {
        self.with_boxed_source(Box::new(source))
    }

    pub fn with_boxed_source(mut self, source: Box<dyn EventSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Builder method to set the time budget for each source's whole fetch.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn with_deduplicator(mut self, deduplicator: impl Deduplicator + 'static) -> Self {
        self.deduplicator = Box::new(deduplicator);
        self
    }

    /// Returns the source names in registration order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fetches from every source concurrently and merges the results.
    ///
    /// # Errors
    ///
    /// Returns the first source error, or a `Timeout` error if a source
    /// exceeds its budget.
    pub async fn fetch_events(&self, query: &Query) -> ProviderResult<Vec<EventRecord>> {
        debug!(
            sources = ?self.source_names(),
            city = query.city(),
            from = %query.from_date(),
            to = %query.to_date(),
            "fetching events"
        );

        let fetches = self.sources.iter().map(|source| self.fetch_one(source.as_ref(), query));
        let per_source = try_join_all(fetches).await?;

        let merged: Vec<EventRecord> = per_source.into_iter().flatten().collect();
        let fetched = merged.len();
        let events = self.deduplicator.dedup(merged);
        info!(fetched, unique = events.len(), "aggregated events");
        Ok(events)
    }

    /// Blocking form of [`fetch_events`](Self::fetch_events).
    ///
    /// Drives the fetch on a private current-thread runtime, so it must not be
    /// called from within an async context.
    ///
    /// # Errors
    ///
    /// Same as `fetch_events`, plus an internal error if the runtime cannot start.
    pub fn get_events(&self, query: &Query) -> ProviderResult<Vec<EventRecord>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to start async runtime: {}", e))
                    .with_source(e)
            })?;
        runtime.block_on(self.fetch_events(query))
    }

    async fn fetch_one(
        &self,
        source: &dyn EventSource,
        query: &Query,
    ) -> ProviderResult<Vec<EventRecord>> {
        let name = source.name();
        let fetch = source.fetch(query, self.sessions.as_ref());

        match tokio::time::timeout(self.source_timeout, fetch).await {
            Ok(Ok(events)) => {
                debug!(source = name, records = events.len(), "source completed");
                Ok(events)
            }
            Ok(Err(e)) => {
                let e = if e.provider().is_none() {
                    e.with_provider(name)
                } else {
                    e
                };
                warn!(source = name, error = %e, "source failed");
                Err(e)
            }
            Err(_) => {
                warn!(
                    source = name,
                    timeout_secs = self.source_timeout.as_secs_f64(),
                    "source timed out"
                );
                Err(ProviderError::timeout(self.source_timeout).with_provider(name))
            }
        }
    }
}

impl std::fmt::Debug for EventAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventAggregator")
            .field("sources", &self.source_names())
            .field("source_timeout", &self.source_timeout)
            .finish_non_exhaustive()
    }
}
