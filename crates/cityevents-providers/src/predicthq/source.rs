//! PredictHQ event source (place lookup, then cursor pagination).

use cityevents_core::{EventRecord, EventSourceTag, Query, dedup_events};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, EventSource};
use crate::transport::{HttpSession, JsonRequest, SessionFactory};

use super::config::PredictHqConfig;
use super::normalize::{event_count, first_place_id, next_url, normalize_page};

/// Items requested per page.
pub const PAGE_SIZE: u64 = 50;

/// PredictHQ events API source.
///
/// The city is first resolved to a place id, which scopes the event search.
/// The first events response reports the total `count`; later pages are read
/// by following each response's `next` URL.
#[derive(Debug, Clone)]
pub struct PredictHqSource {
    config: PredictHqConfig,
}

impl PredictHqSource {
    pub const NAME: &'static str = "predicthq";

    /// Creates a new source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: PredictHqConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;
        Ok(Self { config })
    }

    fn authorized(&self, request: JsonRequest) -> JsonRequest {
        request
            .with_header("Authorization", self.config.authorization())
            .with_header("Accept", "application/json")
    }

    fn place_request(&self, query: &Query) -> JsonRequest {
        self.authorized(
            JsonRequest::new(self.config.places_url.as_str())
                .with_query("q", query.city())
                .with_query("country", query.country_code()),
        )
    }

    fn search_request(&self, query: &Query, place_id: &str) -> JsonRequest {
        let mut request = JsonRequest::new(self.config.events_url.as_str())
            .with_query("country", query.country_code())
            .with_query("sort", "start")
            .with_query("limit", PAGE_SIZE.to_string())
            .with_query("active.gte", query.from_iso())
            .with_query("active.lte", query.to_iso());
        if !self.config.category.trim().is_empty() {
            request = request.with_query("category", &self.config.category);
        }
        self.authorized(
            request
                .with_query("place.scope", place_id)
                .with_query("state", "active"),
        )
    }

    async fn resolve_place(
        &self,
        session: &dyn HttpSession,
        query: &Query,
    ) -> ProviderResult<String> {
        let places = session.get_json(self.place_request(query)).await?;
        let place_id = first_place_id(&places)
            .ok_or_else(|| ProviderError::place_not_found(query.city(), query.country_code()))?;
        debug!(city = query.city(), place_id = %place_id, "resolved predicthq place");
        Ok(place_id)
    }

    async fn fetch_all(
        &self,
        query: &Query,
        sessions: &dyn SessionFactory,
    ) -> ProviderResult<Vec<EventRecord>> {
        let session = sessions.open_session()?;
        let place_id = self.resolve_place(session.as_ref(), query).await?;

        let mut page = session
            .get_json(self.search_request(query, &place_id))
            .await?;
        let pages = match event_count(&page) {
            Some(count) => self.config.page_count.page_count(count, PAGE_SIZE),
            None => {
                debug!("predicthq response has no count");
                1
            }
        };

        let mut events = normalize_page(&page, query);
        debug!(page = 0, pages, records = events.len(), "predicthq page");

        for index in 1..pages {
            let Some(next) = next_url(&page) else {
                debug!(page = index, pages, "predicthq has no next page, stopping");
                break;
            };
            page = session.get_json(self.authorized(JsonRequest::new(next))).await?;
            let records = normalize_page(&page, query);
            debug!(page = index, pages, records = records.len(), "predicthq page");
            events.extend(records);
        }

        let fetched = events.len();
        let events = dedup_events(events);
        info!(
            pages,
            fetched,
            unique = events.len(),
            "fetched predicthq events"
        );
        Ok(events)
    }
}

impl EventSource for PredictHqSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tag(&self) -> EventSourceTag {
        EventSourceTag::PredictHq
    }

    fn fetch<'a>(
        &'a self,
        query: &'a Query,
        sessions: &'a dyn SessionFactory,
    ) -> BoxFuture<'a, ProviderResult<Vec<EventRecord>>> {
        Box::pin(self.fetch_all(query, sessions))
    }
}
