//! Client configuration options.
//!
//! Every setting can be given explicitly through [`ConfigBuilder`]; whatever
//! is left unset falls back to the `APCA_*` environment variables and then to
//! built-in defaults.

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::{ApiVersion, Environment, Error, Result};

/// API key ID.
pub const ENV_KEY_ID: &str = "APCA_API_KEY_ID";
/// API secret key.
pub const ENV_SECRET_KEY: &str = "APCA_API_SECRET_KEY";
/// OAuth access token, used instead of the key pair when set.
pub const ENV_OAUTH_TOKEN: &str = "APCA_API_OAUTH_TOKEN";
/// Trading API base URL.
pub const ENV_BASE_URL: &str = "APCA_API_BASE_URL";
/// Market data API base URL.
pub const ENV_DATA_URL: &str = "APCA_API_DATA_URL";
/// REST API version path segment.
pub const ENV_API_VERSION: &str = "APCA_API_VERSION";
/// Maximum number of retries.
pub const ENV_RETRY_MAX: &str = "APCA_RETRY_MAX";
/// Seconds to wait between retries.
pub const ENV_RETRY_WAIT: &str = "APCA_RETRY_WAIT";
/// Comma-separated HTTP statuses to retry on.
pub const ENV_RETRY_CODES: &str = "APCA_RETRY_CODES";

/// Configuration for the Alpaca client.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::{ClientConfig, Environment};
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .key_id("AKEXAMPLE")
///     .secret_key("secret")
///     .environment(Environment::Paper)
///     .timeout(Duration::from_secs(60))
///     .build_with(|_| None)
///     .expect("valid config");
///
/// assert_eq!(config.base_url, "https://paper-api.alpaca.markets");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// API key ID
    pub key_id: String,
    /// API secret key
    pub secret_key: SecretString,
    /// OAuth token; takes precedence over the key pair
    pub oauth_token: Option<SecretString>,
    /// Trading API base URL, without trailing slash
    pub base_url: String,
    /// Market data API base URL, without trailing slash
    pub data_url: String,
    /// REST API version path segment
    pub api_version: ApiVersion,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a configuration entirely from the environment.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Returns `true` if requests authenticate with an OAuth token.
    pub fn uses_oauth(&self) -> bool {
        self.oauth_token.is_some()
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("key_id", &self.key_id)
            .field("secret_key", &"[REDACTED]")
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("data_url", &self.data_url)
            .field("api_version", &self.api_version)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ConfigBuilder {
    key_id: Option<String>,
    secret_key: Option<SecretString>,
    oauth_token: Option<SecretString>,
    environment: Option<Environment>,
    base_url: Option<String>,
    data_url: Option<String>,
    api_version: Option<ApiVersion>,
    retry_max: Option<u32>,
    retry_wait: Option<Duration>,
    retry_codes: Option<Vec<u16>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ConfigBuilder {
    /// Set the API key ID.
    pub fn key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set the API secret key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(SecretString::from(secret_key.into()));
        self
    }

    /// Authenticate with an OAuth token instead of the key pair.
    pub fn oauth_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = Some(SecretString::from(token.into()));
        self
    }

    /// Pick the trading endpoint by environment.
    ///
    /// An explicit [`base_url`](Self::base_url) still wins.
    pub fn environment(mut self, env: Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the trading API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the market data API base URL.
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = Some(url.into());
        self
    }

    /// Set the API version path segment.
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Set the maximum number of retries.
    pub fn retry_max(mut self, max: u32) -> Self {
        self.retry_max = Some(max);
        self
    }

    /// Set the wait between retries.
    pub fn retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = Some(wait);
        self
    }

    /// Set the HTTP statuses that trigger a retry.
    pub fn retry_codes(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.retry_codes = Some(codes.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build, falling back to the process environment.
    pub fn build(self) -> Result<ClientConfig> {
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Build, falling back to `lookup` for unset values.
    ///
    /// `lookup` receives an environment variable name and returns its value.
    pub fn build_with<F>(self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let oauth_token = self
            .oauth_token
            .or_else(|| lookup(ENV_OAUTH_TOKEN).map(SecretString::from));

        let key_id = self.key_id.or_else(|| lookup(ENV_KEY_ID));
        let secret_key = self
            .secret_key
            .or_else(|| lookup(ENV_SECRET_KEY).map(SecretString::from));

        let (key_id, secret_key) = match (key_id, secret_key, &oauth_token) {
            (Some(id), Some(secret), _) => (id, secret),
            (id, secret, Some(_)) => (
                id.unwrap_or_default(),
                secret.unwrap_or_else(|| SecretString::from(String::new())),
            ),
            (None, _, None) => {
                return Err(Error::Config(format!(
                    "Key ID must be given ({ENV_KEY_ID}) to access the Alpaca API"
                )))
            }
            (Some(_), None, None) => {
                return Err(Error::Config(format!(
                    "Secret key must be given ({ENV_SECRET_KEY}) to access the Alpaca API"
                )))
            }
        };

        let base_url = match (self.base_url, self.environment) {
            (Some(url), _) => url,
            (None, Some(env)) => env.trading_base_url().to_string(),
            (None, None) => lookup(ENV_BASE_URL)
                .unwrap_or_else(|| Environment::Live.trading_base_url().to_string()),
        };
        let data_url = self
            .data_url
            .or_else(|| lookup(ENV_DATA_URL))
            .unwrap_or_else(|| Environment::Live.data_base_url().to_string());

        let api_version = match self.api_version {
            Some(v) => v,
            None => match lookup(ENV_API_VERSION) {
                Some(raw) => ApiVersion::new(raw.trim())
                    .map_err(|e| Error::Config(format!("{ENV_API_VERSION}: {e}")))?,
                None => ApiVersion::default(),
            },
        };

        let defaults = RetryConfig::default();
        let max_retries = match self.retry_max {
            Some(max) => max,
            None => match lookup(ENV_RETRY_MAX) {
                Some(raw) => parse_retry_max(&raw)?,
                None => defaults.max_retries,
            },
        };
        let wait = match self.retry_wait {
            Some(wait) => wait,
            None => match lookup(ENV_RETRY_WAIT) {
                Some(raw) => parse_retry_wait(&raw)?,
                None => defaults.wait,
            },
        };
        let retry_statuses = match self.retry_codes {
            Some(codes) => codes,
            None => match lookup(ENV_RETRY_CODES) {
                Some(raw) => parse_retry_codes(&raw)?,
                None => defaults.retry_statuses,
            },
        };

        Ok(ClientConfig {
            key_id,
            secret_key,
            oauth_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
            api_version,
            retry: RetryConfig {
                max_retries,
                wait,
                retry_statuses,
            },
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            user_agent: self.user_agent.unwrap_or_else(|| {
                format!("alpaca-trade-rs/{} (Rust)", env!("CARGO_PKG_VERSION"))
            }),
        })
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("key_id", &self.key_id)
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("data_url", &self.data_url)
            .finish_non_exhaustive()
    }
}

fn parse_retry_max(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{ENV_RETRY_MAX} must be a non-negative integer, got {raw:?}")))
}

fn parse_retry_wait(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| Error::Config(format!("{ENV_RETRY_WAIT} must be a non-negative number of seconds, got {raw:?}")))
}

fn parse_retry_codes(raw: &str) -> Result<Vec<u16>> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            code.parse()
                .map_err(|_| Error::Config(format!("{ENV_RETRY_CODES} contains invalid status {code:?}")))
        })
        .collect()
}

/// Configuration for automatic retries.
///
/// A response whose status is in `retry_statuses` is retried after a fixed
/// `wait`, up to `max_retries` times. Other failures are returned at once.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Wait between attempts
    pub wait: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            wait: Duration::from_secs(3),
            retry_statuses: vec![429, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the wait between attempts.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Set the statuses to retry on.
    pub fn with_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

/// Expose the secret for header construction.
pub(crate) fn expose(secret: &SecretString) -> &str {
    secret.expose_secret()
}
