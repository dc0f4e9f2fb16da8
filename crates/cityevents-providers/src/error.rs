//! Error types for event source operations.
//!
//! Field-level and page-level problems never reach this type: they are
//! absorbed by the normalizers. A [`ProviderError`] always aborts the
//! aggregation it occurs in.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credentials were rejected (401).
    AuthenticationFailed,
    /// The credentials lack access to the resource (403).
    AuthorizationFailed,
    /// Connection failed, DNS resolution failed, request timed out, etc.
    NetworkError,
    /// Too many requests (429).
    RateLimited,
    /// The server returned an error status.
    ServerError,
    /// The body was not JSON or lacked a field pagination depends on.
    InvalidResponse,
    /// The city could not be resolved to a place by the source.
    PlaceNotFound,
    /// A source did not finish within its time budget.
    Timeout,
    /// Missing or invalid configuration.
    ConfigurationError,
    /// Unexpected internal state.
    InternalError,
}

impl ProviderErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::PlaceNotFound => "place_not_found",
            Self::Timeout => "timeout",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while fetching from an event source.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The source that raised the error (e.g. "ticketmaster").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// The city has no matching place in the source's catalogue.
    pub fn place_not_found(city: &str, country_code: &str) -> Self {
        Self::new(
            ProviderErrorCode::PlaceNotFound,
            format!("no place matches city '{}' in country '{}'", city, country_code),
        )
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ProviderErrorCode::Timeout,
            format!("did not complete within {}s", after.as_secs_f64()),
        )
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_strings() {
        assert_eq!(ProviderErrorCode::PlaceNotFound.to_string(), "place_not_found");
        assert_eq!(ProviderErrorCode::Timeout.as_str(), "timeout");
    }

    #[test]
    fn place_not_found_is_distinct_from_timeout() {
        let place = ProviderError::place_not_found("atlantis", "GR");
        let timeout = ProviderError::timeout(Duration::from_secs(5));

        assert_eq!(place.code(), ProviderErrorCode::PlaceNotFound);
        assert_eq!(timeout.code(), ProviderErrorCode::Timeout);
        assert!(place.message().contains("atlantis"));
        assert!(timeout.message().contains('5'));
    }

    #[test]
    fn display_includes_provider() {
        let err = ProviderError::rate_limited("slow down").with_provider("predicthq");
        let display = err.to_string();
        assert!(display.starts_with("[predicthq] "));
        assert!(display.contains("rate_limited"));
        assert!(display.contains("slow down"));
    }

    #[test]
    fn with_source_is_exposed() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset by peer");
        let err = ProviderError::network("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
