//! Ticketmaster event source (offset pagination).

use cityevents_core::{EventRecord, EventSourceTag, Query, dedup_events};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, EventSource};
use crate::transport::{HttpSession, JsonRequest, SessionFactory};

use super::config::TicketmasterConfig;
use super::normalize::{normalize_page, total_pages};

/// Items requested per page.
pub const PAGE_SIZE: u64 = 200;

/// Ticketmaster refuses requests where `page * size` reaches this bound.
const DEEP_PAGING_LIMIT: u64 = 1000;

/// Ticketmaster Discovery API source.
///
/// The first response reports `page.totalPages`; the remaining pages are then
/// requested one at a time by page number.
#[derive(Debug, Clone)]
pub struct TicketmasterSource {
    config: TicketmasterConfig,
}

impl TicketmasterSource {
    pub const NAME: &'static str = "ticketmaster";

    /// Creates a new source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: TicketmasterConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;
        Ok(Self { config })
    }

    /// The request for page 0; later pages add a `page` parameter.
    fn search_request(&self, query: &Query) -> JsonRequest {
        JsonRequest::new(self.config.events_url.as_str())
            .with_query("apikey", &self.config.api_key)
            .with_query("locale", &self.config.locale)
            .with_query("startDateTime", format!("{}T00:00:00Z", query.from_iso()))
            .with_query("endDateTime", format!("{}T00:00:00Z", query.to_iso()))
            .with_query("size", PAGE_SIZE.to_string())
            .with_query("city", query.city())
            .with_query("countryCode", query.country_code())
    }

    /// Fetches one page.
    ///
    /// A non-2xx reply with a JSON body is an error payload and is returned as
    /// a page without events; this is how Ticketmaster rejects pages past the
    /// deep paging window. Rejected credentials (401, 403) stay fatal.
    async fn get_page(
        &self,
        session: &dyn HttpSession,
        request: JsonRequest,
    ) -> ProviderResult<serde_json::Value> {
        let page = request.query_value("page").unwrap_or("0").to_string();
        let reply = session.get_reply(request).await?;
        if reply.is_success() || matches!(reply.status, 401 | 403) {
            return reply.into_json();
        }
        warn!(
            status = reply.status,
            page = %page,
            "ticketmaster returned an error payload, counting the page as empty"
        );
        debug!(body = %reply.body, "ticketmaster error payload");
        Ok(serde_json::Value::Null)
    }

    async fn fetch_all(
        &self,
        query: &Query,
        sessions: &dyn SessionFactory,
    ) -> ProviderResult<Vec<EventRecord>> {
        let session = sessions.open_session()?;

        let first = self
            .get_page(session.as_ref(), self.search_request(query))
            .await?;
        let pages = match total_pages(&first) {
            Some(0) => {
                debug!(city = query.city(), "ticketmaster reports no pages");
                return Ok(Vec::new());
            }
            Some(pages) => pages,
            None => {
                debug!("ticketmaster response has no paging metadata");
                1
            }
        };

        if pages.saturating_mul(PAGE_SIZE) > DEEP_PAGING_LIMIT {
            warn!(
                pages,
                limit = DEEP_PAGING_LIMIT,
                "result set exceeds the deep paging window, later pages may be rejected; \
                 consider a narrower date range"
            );
        }

        let mut events = normalize_page(&first);
        debug!(page = 0, pages, records = events.len(), "ticketmaster page");

        for page in 1..pages {
            let request = self
                .search_request(query)
                .with_query("page", page.to_string());
            let body = self.get_page(session.as_ref(), request).await?;
            let records = normalize_page(&body);
            debug!(page, pages, records = records.len(), "ticketmaster page");
            events.extend(records);
        }

        let fetched = events.len();
        let events = dedup_events(events);
        info!(
            pages,
            fetched,
            unique = events.len(),
            "fetched ticketmaster events"
        );
        Ok(events)
    }
}

impl EventSource for TicketmasterSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tag(&self) -> EventSourceTag {
        EventSourceTag::Ticketmaster
    }

    fn fetch<'a>(
        &'a self,
        query: &'a Query,
        sessions: &'a dyn SessionFactory,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>> {
        Box::pin(self.fetch_all(query, sessions))
    }
}
