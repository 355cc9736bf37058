//! Client configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;
use reqwest::Url;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API URL does not parse.
    #[error("invalid API URL {url}: {reason}")]
    InvalidApiUrl {
        /// URL as configured
        url: String,

        /// Parser message
        reason: String,
    },

    /// A zero interval would poll continuously.
    #[error("poll interval must be at least one second")]
    ZeroPollInterval,

    /// A zero timeout would fail every request.
    #[error("HTTP timeout must be at least one second")]
    ZeroHttpTimeout,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Storefront client settings.
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Storefront API base URL
    #[arg(
        long,
        env = "SILK_API_URL",
        default_value = "http://localhost:4000",
        global = true
    )]
    pub api_url: String,

    /// Local state file (session token and search history)
    #[arg(
        long,
        env = "SILK_STATE_FILE",
        default_value = ".silk/state.json",
        global = true
    )]
    pub state_file: PathBuf,

    /// Seconds between order status refreshes
    #[arg(
        long,
        env = "SILK_POLL_INTERVAL_SECS",
        default_value_t = 5,
        global = true
    )]
    pub poll_interval_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        env = "SILK_HTTP_TIMEOUT_SECS",
        default_value_t = 10,
        global = true
    )]
    pub http_timeout_secs: u64,
}

impl ClientConfig {
    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_url).map_err(|error| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            reason: error.to_string(),
        })?;

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroHttpTimeout);
        }

        Ok(())
    }

    /// Delay between order status refreshes
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// HTTP request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        client: ClientConfig,
    }

    fn parse(args: &[&str]) -> Result<ClientConfig, clap::Error> {
        TestCli::try_parse_from(std::iter::once("silk").chain(args.iter().copied()))
            .map(|cli| cli.client)
    }

    #[test]
    fn explicit_flags_override_defaults() -> Result<(), clap::Error> {
        let config = parse(&[
            "--api-url",
            "https://shop.example.com",
            "--poll-interval-secs",
            "2",
        ])?;

        assert_eq!(config.api_url, "https://shop.example.com");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.validate(), Ok(()));

        Ok(())
    }

    #[test]
    fn zero_poll_interval_is_rejected() -> Result<(), clap::Error> {
        let config = parse(&[
            "--api-url",
            "https://shop.example.com",
            "--poll-interval-secs",
            "0",
        ])?;

        assert_eq!(config.validate(), Err(ConfigError::ZeroPollInterval));

        Ok(())
    }

    #[test]
    fn malformed_url_is_rejected() -> Result<(), clap::Error> {
        let config = parse(&["--api-url", "shop", "--http-timeout-secs", "3"])?;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidApiUrl { .. })
        ));

        Ok(())
    }
}
