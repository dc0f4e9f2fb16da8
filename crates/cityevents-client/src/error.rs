//! Client error types.

use std::fmt;

use cityevents_core::QueryError;
use cityevents_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Invalid command-line input.
    Input(String),
    /// A source failed; no results are written.
    Provider(ProviderError),
    /// Results could not be serialized.
    Output(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Input(msg) => write!(f, "invalid input: {}", msg),
            Self::Provider(err) => write!(f, "provider error: {}", err),
            Self::Output(msg) => write!(f, "output error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<QueryError> for ClientError {
    fn from(err: QueryError) -> Self {
        Self::Input(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityevents_providers::ProviderErrorCode;

    #[test]
    fn display_prefixes_kind() {
        assert_eq!(
            ClientError::Config("missing api_key".into()).to_string(),
            "configuration error: missing api_key"
        );
        assert_eq!(
            ClientError::Input("bad date".into()).to_string(),
            "invalid input: bad date"
        );
    }

    #[test]
    fn provider_error_keeps_code() {
        let err: ClientError = ProviderError::place_not_found("atlantis", "XX")
            .with_provider("predicthq")
            .into();
        match &err {
            ClientError::Provider(inner) => {
                assert_eq!(inner.code(), ProviderErrorCode::PlaceNotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("atlantis"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
