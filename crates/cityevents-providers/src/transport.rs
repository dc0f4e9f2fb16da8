//! HTTP session capability.
//!
//! Sources never talk to `reqwest` directly. They open one [`HttpSession`]
//! per fetch through a [`SessionFactory`] and issue JSON `GET`s through it,
//! which keeps page-walking logic testable without a network.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::BoxFuture;

/// A JSON `GET` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRequest {
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl JsonRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Builder method to append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Builder method to append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response whose body parsed as JSON, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub status: u16,
    /// `Retry-After` in seconds, when the server sent one.
    pub retry_after: Option<u64>,
    pub body: Value,
}

impl JsonReply {
    /// A `200 OK` reply.
    pub fn ok(body: Value) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            retry_after: None,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body of a 2xx reply, or the error its status maps to.
    pub fn into_json(self) -> ProviderResult<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(status_error(
                self.status,
                self.retry_after,
                &self.body.to_string(),
            ))
        }
    }
}

/// Maps a non-2xx status to an error.
fn status_error(status: u16, retry_after: Option<u64>, body: &str) -> ProviderError {
    match status {
        429 => ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )),
        401 => ProviderError::authentication("API key rejected"),
        403 => ProviderError::authorization("access denied"),
        _ => ProviderError::server(format!("API error (HTTP {}): {}", status, body)),
    }
}

/// One HTTP session, scoped to a single source fetch.
pub trait HttpSession: Send + Sync {
    /// Issues a `GET` and returns its status with the parsed body.
    ///
    /// Non-2xx replies with a JSON body are returned, not failed. Transport
    /// failures and bodies that are not JSON are errors.
    fn get_reply(&self, request: JsonRequest) -> BoxFuture<'_, ProviderResult<JsonReply>>;

    /// Issues a `GET` and parses the body as JSON; non-2xx statuses are errors.
    fn get_json(&self, request: JsonRequest) -> BoxFuture<'_, ProviderResult<Value>> {
        let reply = self.get_reply(request);
        Box::pin(async move { reply.await?.into_json() })
    }
}

/// Opens a fresh [`HttpSession`] for each source fetch.
pub trait SessionFactory: Send + Sync {
    fn open_session(&self) -> ProviderResult<Box<dyn HttpSession>>;
}

/// Transport settings shared by all sources.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Timeout for a single request.
    pub request_timeout: Duration,
    /// Budget for one source's whole fetch, all pages included.
    pub source_timeout: Duration,
    /// Whether to verify TLS certificates.
    pub verify_tls: bool,
    pub user_agent: String,
}

impl HttpConfig {
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 60;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_zero() {
            return Err("request timeout must be greater than zero".to_string());
        }
        if self.source_timeout.is_zero() {
            return Err("source timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(Self::DEFAULT_REQUEST_TIMEOUT_SECS),
            source_timeout: Duration::from_secs(Self::DEFAULT_SOURCE_TIMEOUT_SECS),
            verify_tls: true,
            user_agent: format!("cityevents/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// [`SessionFactory`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestSessionFactory {
    config: HttpConfig,
}

impl ReqwestSessionFactory {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for ReqwestSessionFactory {
    fn open_session(&self) -> ProviderResult<Box<dyn HttpSession>> {
        if !self.config.verify_tls {
            debug!("TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!self.config.verify_tls)
            .timeout(self.config.request_timeout)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::network(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Box::new(ReqwestSession { client }))
    }
}

struct ReqwestSession {
    client: reqwest::Client,
}

impl ReqwestSession {
    async fn fetch(&self, request: JsonRequest) -> ProviderResult<JsonReply> {
        let mut builder = self.client.get(request.url());
        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        trace!(url = %request.url(), params = request.query().len(), "sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        match serde_json::from_str(&body) {
            Ok(body) => Ok(JsonReply {
                status: status.as_u16(),
                retry_after,
                body,
            }),
            Err(_) if !status.is_success() => {
                Err(status_error(status.as_u16(), retry_after, &body))
            }
            Err(e) => Err(ProviderError::invalid_response(format!(
                "failed to parse response: {}",
                e
            ))
            .with_source(e)),
        }
    }
}

impl HttpSession for ReqwestSession {
    fn get_reply(&self, request: JsonRequest) -> BoxFuture<'_, ProviderResult<JsonReply>> {
        Box::pin(self.fetch(request))
    }
}
