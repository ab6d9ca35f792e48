use crate::{
    gateway::{DEFAULT_TIMEOUT, FetchOptions},
    retry::{DEFAULT_BACKOFF, DEFAULT_RETRIES, RetryPolicy},
};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "POSTBOARD_";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
}

/// Gateway settings. Every field can be set through a `POSTBOARD_` prefixed environment
/// variable, e.g. `POSTBOARD_BASE_URL` or `POSTBOARD_RETRY_WRITES=false`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Whether POST, PUT and DELETE calls are retried like reads. A retried write whose first
    /// attempt did reach the server is applied twice.
    #[serde(default = "default_retry_writes")]
    pub retry_writes: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_ms() -> u64 {
    u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_backoff_ms() -> u64 {
    u64::try_from(DEFAULT_BACKOFF.as_millis()).unwrap_or(u64::MAX)
}

fn default_retry_writes() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
            retry_writes: default_retry_writes(),
        }
    }
}

impl GatewayConfig {
    /// Reads `.env` if there is one, then the `POSTBOARD_` variables of the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if e.not_found() {
                debug!("No .dotenv file found");
            } else {
                return Err(e.into());
            }
        }

        envy::prefixed(ENV_PREFIX)
            .from_env()
            .map_err(ConfigError::from)
    }

    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            retry: RetryPolicy::new(self.retries, Duration::from_millis(self.backoff_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::{ENV_PREFIX, GatewayConfig},
        gateway::FetchOptions,
    };
    use std::time::Duration;

    #[test]
    fn defaults_match_fetch_defaults() {
        let config: GatewayConfig = envy::prefixed(ENV_PREFIX)
            .from_iter(Vec::<(String, String)>::new())
            .unwrap();

        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.fetch_options(), FetchOptions::default());
        assert!(config.retry_writes);
    }

    #[test]
    fn prefixed_overrides() {
        let vars = [
            ("POSTBOARD_BASE_URL", "http://api.test/v1"),
            ("POSTBOARD_TIMEOUT_MS", "250"),
            ("POSTBOARD_RETRIES", "5"),
            ("POSTBOARD_BACKOFF_MS", "20"),
            ("POSTBOARD_RETRY_WRITES", "false"),
            ("UNRELATED", "ignored"),
        ]
        .map(|(key, value)| (key.to_owned(), value.to_owned()));

        let config: GatewayConfig = envy::prefixed(ENV_PREFIX).from_iter(vars).unwrap();
        let options = config.fetch_options();

        assert_eq!(config.base_url, "http://api.test/v1");
        assert!(!config.retry_writes);
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.retry.retries, 5);
        assert_eq!(options.retry.delay(1), Duration::from_millis(40));
    }
}
