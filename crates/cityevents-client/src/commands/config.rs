//! Configuration commands.

use std::path::{Path, PathBuf};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Returns the config file in effect: the override if given, else the default path.
pub fn effective_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(ClientConfig::default_path)
}

/// Renders the configuration as TOML. Secret references are shown unresolved.
pub fn render(config: &ClientConfig) -> ClientResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
}

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, override_path: Option<&Path>) -> ClientResult<()> {
    let toml_str = render(config)?;
    println!("# config.toml ({})", effective_path(override_path).display());
    println!("{}", toml_str);
    Ok(())
}

/// Checks that every section converts, which resolves all credentials.
pub fn check(config: &ClientConfig) -> ClientResult<()> {
    config
        .ticketmaster
        .to_provider_config()
        .map_err(|e| ClientError::Config(format!("invalid Ticketmaster settings: {}", e)))?;
    config
        .predicthq
        .to_provider_config()
        .map_err(|e| ClientError::Config(format!("invalid PredictHQ settings: {}", e)))?;
    config
        .http
        .to_provider_config()
        .validate()
        .map_err(|e| ClientError::Config(format!("invalid HTTP settings: {}", e)))?;
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    check(config)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(override_path: Option<&Path>) -> ClientResult<()> {
    println!("config: {}", effective_path(override_path).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ClientConfig {
        toml::from_str(
            "[ticketmaster]\napi_key = \"a\"\n[predicthq]\naccess_token = \"b\"\n",
        )
        .unwrap()
    }

    #[test]
    fn complete_config_checks() {
        assert!(check(&complete()).is_ok());
    }

    #[test]
    fn missing_token_fails_check() {
        let mut config = complete();
        config.predicthq.access_token = None;
        let err = check(&config).unwrap_err();
        assert!(err.to_string().contains("PredictHQ"));
    }

    #[test]
    fn zero_timeout_fails_check() {
        let mut config = complete();
        config.http.request_timeout_secs = 0;
        let err = check(&config).unwrap_err();
        assert!(err.to_string().contains("HTTP"));
    }

    #[test]
    fn render_keeps_references_unresolved() {
        let mut config = complete();
        config.ticketmaster.api_key = Some("env::TICKETMASTER_API_KEY".into());

        let rendered = render(&config).unwrap();

        assert!(rendered.contains("api_key = \"env::TICKETMASTER_API_KEY\""));
        assert!(rendered.contains("page_count = \"legacy\""));
        let reparsed: ClientConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.predicthq.access_token.as_deref(), Some("b"));
    }

    #[test]
    fn override_path_wins() {
        let custom = Path::new("/tmp/custom.toml");
        assert_eq!(effective_path(Some(custom)), PathBuf::from("/tmp/custom.toml"));
        assert_eq!(effective_path(None), ClientConfig::default_path());
    }
}
