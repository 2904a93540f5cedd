//! Client configuration.
//!
//! # Design
//! `ClientConfig` is built once and handed to `RequestClient::new`; the
//! client never reads the environment. `load()` is the startup path:
//! programmatic defaults overlaid with `NOTES_API_*` environment variables.

use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default per-request time bound in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Prefix of the environment variables read by `ClientConfig::load`.
pub const ENV_PREFIX: &str = "NOTES_API_";

/// Immutable settings shared by every request of a `RequestClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prefix prepended verbatim to every request path.
    pub base_url: String,
    /// Time bound applied when a request does not set its own.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// `base_url` is stored as given; paths are appended to it verbatim.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Defaults overlaid with `NOTES_API_BASE_URL` / `NOTES_API_TIMEOUT_MS`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(ClientConfig::default()))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extract and validate a config from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: ClientConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_fifteen_seconds() {
        let config = ClientConfig::new("http://api.test");
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn base_url_is_kept_verbatim() {
        let config = ClientConfig::new("http://api.test/api/");
        assert_eq!(config.base_url, "http://api.test/api/");
    }

    #[test]
    fn from_figment_applies_overrides() {
        let figment = Figment::new()
            .merge(Serialized::defaults(ClientConfig::default()))
            .merge(Serialized::default("base_url", "http://notes.test/v1/"))
            .merge(Serialized::default("timeout_ms", 250));
        let config = ClientConfig::from_figment(figment).unwrap();
        assert_eq!(config.base_url, "http://notes.test/v1/");
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    fn missing_timeout_falls_back_to_default() {
        let figment = Figment::new().merge(Serialized::default("base_url", "http://notes.test"));
        let config = ClientConfig::from_figment(figment).unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let figment = Figment::new().merge(Serialized::default("base_url", ""));
        let err = ClientConfig::from_figment(figment).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::new("http://notes.test")
            .with_timeout_ms(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(0)));
    }

    #[test]
    fn malformed_timeout_is_a_load_error() {
        let figment = Figment::new()
            .merge(Serialized::default("base_url", "http://notes.test"))
            .merge(Serialized::default("timeout_ms", "soon"));
        let err = ClientConfig::from_figment(figment).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn load_reads_prefixed_env() {
        temp_env::with_vars(
            [
                ("NOTES_API_BASE_URL", Some("http://env.test/")),
                ("NOTES_API_TIMEOUT_MS", Some("3000")),
            ],
            || {
                let config = ClientConfig::load().unwrap();
                assert_eq!(config.base_url, "http://env.test/");
                assert_eq!(config.timeout_ms, 3000);
            },
        );
    }

    #[test]
    fn load_without_env_uses_defaults() {
        temp_env::with_vars_unset(["NOTES_API_BASE_URL", "NOTES_API_TIMEOUT_MS"], || {
            let config = ClientConfig::load().unwrap();
            assert_eq!(config, ClientConfig::default());
        });
    }
}
