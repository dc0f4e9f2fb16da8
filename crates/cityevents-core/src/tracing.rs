//! Tracing setup for cityevents.
//!
//! Logs always go to stderr so that `--stdout` output stays valid JSON.
//!
//! ```ignore
//! use cityevents_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::from_flags(debug, json))?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Single-line format (default)
    #[default]
    Compact,
    /// One JSON object per line, for log shippers
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used when `RUST_LOG` is not set
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file/line information
    pub include_location: bool,
    /// Include the module path
    pub include_target: bool,
    pub include_timestamp: bool,
    /// Custom env filter directive (overrides `default_level` and `RUST_LOG`)
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: false,
            include_timestamp: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Verbose profile for troubleshooting a fetch.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            include_target: true,
            include_timestamp: false,
            env_filter: None,
        }
    }

    /// Structured profile for running under a scheduler.
    #[must_use]
    pub fn json() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Json,
            include_location: true,
            include_target: true,
            include_timestamp: true,
            env_filter: None,
        }
    }

    /// Picks a profile from the CLI flags. `debug` raises the level of any profile.
    #[must_use]
    pub fn from_flags(debug: bool, json: bool) -> Self {
        match (debug, json) {
            (true, true) => Self::json().with_level(Level::DEBUG),
            (true, false) => Self::cli_debug(),
            (false, true) => Self::json(),
            (false, false) => Self::default(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The directive used when neither a custom filter nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("cityevents={}", self.default_level)
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set or the custom
/// filter directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = if let Some(ref filter) = config.env_filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.default_directive()))
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target);

    let layer = match config.output_format {
        TracingOutputFormat::Pretty => base.pretty().boxed(),
        TracingOutputFormat::Json => base.json().boxed(),
        TracingOutputFormat::Compact if config.include_timestamp => base.compact().boxed(),
        TracingOutputFormat::Compact => base.compact().without_time().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_quiet() {
        let config = TracingConfig::default();
        assert_eq!(config.default_level, Level::WARN);
        assert_eq!(config.output_format, TracingOutputFormat::Compact);
        assert!(config.env_filter.is_none());
        assert_eq!(config.default_directive(), "cityevents=WARN");
    }

    #[test]
    fn flags_select_profiles() {
        let debug = TracingConfig::from_flags(true, false);
        assert_eq!(debug.default_level, Level::DEBUG);
        assert!(debug.include_location);

        let json = TracingConfig::from_flags(false, true);
        assert_eq!(json.output_format, TracingOutputFormat::Json);
        assert_eq!(json.default_level, Level::INFO);

        let both = TracingConfig::from_flags(true, true);
        assert_eq!(both.output_format, TracingOutputFormat::Json);
        assert_eq!(both.default_level, Level::DEBUG);
    }

    #[test]
    fn builder_methods() {
        let config = TracingConfig::default()
            .with_level(Level::TRACE)
            .with_format(TracingOutputFormat::Pretty)
            .with_env_filter("cityevents_providers=trace");

        assert_eq!(config.default_level, Level::TRACE);
        assert_eq!(config.output_format, TracingOutputFormat::Pretty);
        assert_eq!(
            config.env_filter.as_deref(),
            Some("cityevents_providers=trace")
        );
    }
}
