//! PredictHQ source configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// How many event pages a reported `count` implies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageCountPolicy {
    /// `count / page_size + 1`: one extra request when `count` is a multiple
    /// of the page size.
    #[default]
    Legacy,
    /// `ceil(count / page_size)`.
    Exact,
}

impl PageCountPolicy {
    /// Returns the number of pages to request, page 0 included.
    pub fn page_count(self, count: u64, page_size: u64) -> u64 {
        match self {
            Self::Legacy => count / page_size + 1,
            Self::Exact => count.div_ceil(page_size),
        }
    }
}

/// Configuration for the PredictHQ events and places APIs.
#[derive(Debug, Clone)]
pub struct PredictHqConfig {
    /// Event search endpoint.
    pub events_url: Url,

    /// Place lookup endpoint, used to resolve the city to a place id.
    pub places_url: Url,

    /// Bearer token sent in the `Authorization` header. A leading `Bearer `
    /// scheme is accepted and not repeated.
    pub access_token: String,

    /// Comma-separated category filter; empty means no filter.
    pub category: String,

    pub page_count: PageCountPolicy,
}

impl PredictHqConfig {
    pub const DEFAULT_EVENTS_URL: &'static str = "https://api.predicthq.com/v1/events/";
    pub const DEFAULT_PLACES_URL: &'static str = "https://api.predicthq.com/v1/places/";

    /// Creates a configuration for the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn new(
        events_url: impl AsRef<str>,
        places_url: impl AsRef<str>,
        access_token: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            events_url: Url::parse(events_url.as_ref())?,
            places_url: Url::parse(places_url.as_ref())?,
            access_token: access_token.into(),
            category: String::new(),
            page_count: PageCountPolicy::default(),
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_page_count(mut self, policy: PageCountPolicy) -> Self {
        self.page_count = policy;
        self
    }

    /// The `Authorization` header value.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bare_token())
    }

    /// The token without surrounding whitespace or a `Bearer` scheme.
    fn bare_token(&self) -> &str {
        let token = self.access_token.trim();
        match token.get(..6) {
            Some(scheme)
                if scheme.eq_ignore_ascii_case("bearer")
                    && token[6..].chars().next().is_none_or(char::is_whitespace) =>
            {
                token[6..].trim_start()
            }
            _ => token,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bare_token().is_empty() {
            return Err("PredictHQ access_token is required".to_string());
        }
        for (field, url) in [("events_url", &self.events_url), ("places_url", &self.places_url)] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!("PredictHQ {field} must be http(s): {url}"));
            }
        }
        Ok(())
    }
}
