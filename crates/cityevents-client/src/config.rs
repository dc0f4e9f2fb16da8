//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/cityevents/config.toml` by default. Every section is optional;
//! URLs and timeouts fall back to their defaults.
//!
//! Credential values (`api_key`, `access_token`) support secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment
//! - plain text used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use cityevents_providers::{
    EventAggregator, HttpConfig, PageCountPolicy, PredictHqConfig, TicketmasterConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::secret;

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the cityevents client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ticketmaster Discovery API settings.
    pub ticketmaster: TicketmasterSettings,

    /// PredictHQ settings.
    pub predicthq: PredictHqSettings,

    /// Transport settings shared by all sources.
    pub http: HttpSettings,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cityevents")
    }

    /// Builds the Ticketmaster + PredictHQ aggregator described by this config.
    ///
    /// Credentials are resolved here, so a missing key fails before any request.
    pub fn build_aggregator(&self) -> ClientResult<EventAggregator> {
        let ticketmaster = self
            .ticketmaster
            .to_provider_config()
            .map_err(ClientError::Config)?;
        let predicthq = self
            .predicthq
            .to_provider_config()
            .map_err(ClientError::Config)?;
        let http = self.http.to_provider_config();

        Ok(EventAggregator::from_configs(ticketmaster, predicthq, http)?)
    }
}

// ---------------------------------------------------------------------------
// Source sections
// ---------------------------------------------------------------------------

/// `[ticketmaster]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketmasterSettings {
    pub events_url: String,

    /// Consumer key (supports `pass::` and `env::` prefixes).
    pub api_key: Option<String>,

    /// Overrides the `locale` parameter (default `*`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Default for TicketmasterSettings {
    fn default() -> Self {
        Self {
            events_url: TicketmasterConfig::DEFAULT_EVENTS_URL.to_string(),
            api_key: None,
            locale: None,
        }
    }
}

impl TicketmasterSettings {
    /// Resolves the key and builds the provider configuration.
    pub fn to_provider_config(&self) -> Result<TicketmasterConfig, String> {
        let api_key =
            secret::resolve_credential("ticketmaster", "api_key", self.api_key.as_deref())?;
        let mut config = TicketmasterConfig::new(&self.events_url, api_key)
            .map_err(|e| format!("invalid [ticketmaster] events_url: {}", e))?;
        if let Some(ref locale) = self.locale {
            config = config.with_locale(locale);
        }
        config.validate()?;
        Ok(config)
    }
}

/// `[predicthq]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictHqSettings {
    pub events_url: String,
    pub places_url: String,

    /// Bearer token (supports `pass::` and `env::` prefixes). A leading
    /// `Bearer ` is accepted and sent once.
    pub access_token: Option<String>,

    /// Comma-separated category filter, e.g. `concerts,festivals`.
    pub category: String,

    pub page_count: PageCountPolicy,
}

impl Default for PredictHqSettings {
    fn default() -> Self {
        Self {
            events_url: PredictHqConfig::DEFAULT_EVENTS_URL.to_string(),
            places_url: PredictHqConfig::DEFAULT_PLACES_URL.to_string(),
            access_token: None,
            category: String::new(),
            page_count: PageCountPolicy::default(),
        }
    }
}

impl PredictHqSettings {
    /// Resolves the token and builds the provider configuration.
    pub fn to_provider_config(&self) -> Result<PredictHqConfig, String> {
        let access_token = secret::resolve_credential(
            "predicthq",
            "access_token",
            self.access_token.as_deref(),
        )?;
        let config = PredictHqConfig::new(&self.events_url, &self.places_url, access_token)
            .map_err(|e| format!("invalid [predicthq] URL: {}", e))?
            .with_category(&self.category)
            .with_page_count(self.page_count);
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// HttpSettings
// ---------------------------------------------------------------------------

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Timeout for a single request, in seconds.
    pub request_timeout_secs: u64,

    /// Budget for one source's whole fetch, in seconds.
    pub source_timeout_secs: u64,

    pub verify_tls: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: HttpConfig::DEFAULT_REQUEST_TIMEOUT_SECS,
            source_timeout_secs: HttpConfig::DEFAULT_SOURCE_TIMEOUT_SECS,
            verify_tls: true,
        }
    }
}

impl HttpSettings {
    pub fn to_provider_config(&self) -> HttpConfig {
        HttpConfig::default()
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_source_timeout(Duration::from_secs(self.source_timeout_secs))
            .with_verify_tls(self.verify_tls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    mod parsing {
        use super::*;

        #[test]
        fn empty_file_uses_defaults() {
            let config: ClientConfig = toml::from_str("").unwrap();
            assert_eq!(
                config.ticketmaster.events_url,
                TicketmasterConfig::DEFAULT_EVENTS_URL
            );
            assert_eq!(config.predicthq.places_url, PredictHqConfig::DEFAULT_PLACES_URL);
            assert_eq!(config.predicthq.page_count, PageCountPolicy::Legacy);
            assert_eq!(config.http.request_timeout_secs, 30);
            assert_eq!(config.http.source_timeout_secs, 60);
            assert!(config.http.verify_tls);
        }

        #[test]
        fn full_file() {
            let toml_content = r#"
[ticketmaster]
events_url = "http://localhost:9000/events.json"
api_key = "tm-key"

[predicthq]
access_token = "phq-token"
category = "concerts,festivals"
page_count = "exact"

[http]
request_timeout_secs = 5
source_timeout_secs = 20
verify_tls = false
"#;
            let config: ClientConfig = toml::from_str(toml_content).unwrap();

            assert_eq!(config.ticketmaster.api_key.as_deref(), Some("tm-key"));
            assert_eq!(config.predicthq.category, "concerts,festivals");
            assert_eq!(config.predicthq.page_count, PageCountPolicy::Exact);
            assert_eq!(
                config.predicthq.events_url,
                PredictHqConfig::DEFAULT_EVENTS_URL
            );

            let http = config.http.to_provider_config();
            assert_eq!(http.request_timeout, Duration::from_secs(5));
            assert_eq!(http.source_timeout, Duration::from_secs(20));
            assert!(!http.verify_tls);
        }

        #[test]
        fn unknown_page_count_is_rejected() {
            let result: Result<ClientConfig, _> =
                toml::from_str("[predicthq]\npage_count = \"sometimes\"\n");
            assert!(result.is_err());
        }

        #[test]
        fn load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[ticketmaster]\napi_key = \"from-file\"").unwrap();

            let config = ClientConfig::load_from(file.path()).unwrap();
            assert_eq!(config.ticketmaster.api_key.as_deref(), Some("from-file"));
        }

        #[test]
        fn load_from_reports_parse_errors() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[http]\nrequest_timeout_secs = \"soon\"").unwrap();

            let err = ClientConfig::load_from(file.path()).unwrap_err();
            assert!(err.starts_with("failed to parse config"));
        }

        #[test]
        fn load_from_missing_file_errors() {
            let dir = tempfile::tempdir().unwrap();
            let err = ClientConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
            assert!(err.starts_with("failed to read config"));
        }

        #[test]
        fn default_path_ends_with_app_dir() {
            assert!(ClientConfig::default_path().ends_with("cityevents/config.toml"));
        }
    }

    mod conversion {
        use super::*;

        #[test]
        fn ticketmaster_with_inline_key() {
            let settings = TicketmasterSettings {
                api_key: Some("tm-key".into()),
                locale: Some("it-it".into()),
                ..Default::default()
            };

            let config = settings.to_provider_config().unwrap();
            assert_eq!(config.api_key, "tm-key");
            assert_eq!(config.locale, "it-it");
        }

        #[test]
        fn ticketmaster_missing_key_errors() {
            let err = TicketmasterSettings::default()
                .to_provider_config()
                .unwrap_err();
            assert!(err.contains("api_key"));
        }

        #[test]
        fn ticketmaster_bad_url_errors() {
            let settings = TicketmasterSettings {
                events_url: "not a url".into(),
                api_key: Some("k".into()),
                ..Default::default()
            };
            assert!(settings.to_provider_config().unwrap_err().contains("events_url"));
        }

        #[test]
        fn predicthq_with_env_reference() {
            unsafe {
                std::env::set_var("_CITYEVENTS_TEST_PHQ_TOKEN", "env-token");
            }
            let settings = PredictHqSettings {
                access_token: Some("env::_CITYEVENTS_TEST_PHQ_TOKEN".into()),
                category: "sports".into(),
                page_count: PageCountPolicy::Exact,
                ..Default::default()
            };

            let config = settings.to_provider_config().unwrap();
            assert_eq!(config.access_token, "env-token");
            assert_eq!(config.category, "sports");
            assert_eq!(config.page_count, PageCountPolicy::Exact);

            unsafe {
                std::env::remove_var("_CITYEVENTS_TEST_PHQ_TOKEN");
            }
        }

        #[test]
        fn predicthq_missing_token_errors() {
            let err = PredictHqSettings::default().to_provider_config().unwrap_err();
            assert!(err.contains("access_token"));
        }

        #[test]
        fn build_aggregator_requires_credentials() {
            let err = ClientConfig::default().build_aggregator().unwrap_err();
            assert!(matches!(err, ClientError::Config(_)));
        }

        #[test]
        fn build_aggregator_with_credentials() {
            let config: ClientConfig = toml::from_str(
                "[ticketmaster]\napi_key = \"a\"\n[predicthq]\naccess_token = \"b\"\n",
            )
            .unwrap();

            let aggregator = config.build_aggregator().unwrap();
            assert_eq!(aggregator.source_names(), vec!["ticketmaster", "predicthq"]);
        }

        #[test]
        fn build_aggregator_rejects_zero_timeout() {
            let config: ClientConfig = toml::from_str(
                "[ticketmaster]\napi_key = \"a\"\n[predicthq]\naccess_token = \"b\"\n\
                 [http]\nsource_timeout_secs = 0\n",
            )
            .unwrap();

            let err = config.build_aggregator().unwrap_err();
            assert!(matches!(err, ClientError::Provider(_)));
        }
    }
}
