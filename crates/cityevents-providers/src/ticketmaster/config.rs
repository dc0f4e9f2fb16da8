//! Ticketmaster source configuration.

use url::Url;

/// Configuration for the Ticketmaster Discovery API.
#[derive(Debug, Clone)]
pub struct TicketmasterConfig {
    /// Event search endpoint.
    pub events_url: Url,

    /// Consumer key sent as the `apikey` parameter.
    pub api_key: String,

    /// Value of the `locale` parameter.
    pub locale: String,
}

impl TicketmasterConfig {
    /// Public Discovery API v2 event search endpoint.
    pub const DEFAULT_EVENTS_URL: &'static str =
        "https://app.ticketmaster.com/discovery/v2/events.json";

    /// Creates a configuration for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(
        events_url: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            events_url: Url::parse(events_url.as_ref())?,
            api_key: api_key.into(),
            locale: "*".to_string(),
        })
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("Ticketmaster api_key is required".to_string());
        }
        if !matches!(self.events_url.scheme(), "http" | "https") {
            return Err(format!(
                "Ticketmaster events_url must be http(s): {}",
                self.events_url
            ));
        }
        Ok(())
    }
}
