//! Configuration for the FireHydrant client

use http::HeaderMap;
use secrecy::SecretString;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default wait before retrying a throttled request.
pub const DEFAULT_BACKOFF: Duration = firehydrant_core::retry::DEFAULT_BACKOFF;

/// Configuration for the FireHydrant client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API token, sent as `Authorization: Bearer <token>`
    pub api_key: Option<SecretString>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Default timeout for requests
    pub timeout: Duration,

    /// Wait before retrying a throttled request when the server gives no
    /// usable `Retry-After`
    pub backoff: Duration,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
            default_headers: HeaderMap::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an API token.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Create a new builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    /// This will look for:
    /// - `FIREHYDRANT_API_KEY` for authentication
    /// - `FIREHYDRANT_BASE_URL` for the API base URL
    /// - `FIREHYDRANT_TIMEOUT` for request timeout (in seconds)
    /// - `FIREHYDRANT_RATE_LIMIT` for requests per second
    /// - `FIREHYDRANT_RATE_BURST` for the token bucket burst size
    /// - `FIREHYDRANT_BACKOFF` for the throttle backoff (in seconds)
    ///
    /// Unparseable numeric values are ignored.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(api_key) = env::var("FIREHYDRANT_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("FIREHYDRANT_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout_str) = env::var("FIREHYDRANT_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        if let Ok(rate_str) = env::var("FIREHYDRANT_RATE_LIMIT")
            && let Ok(rate) = rate_str.parse::<f64>()
        {
            config.rate_limit.requests_per_second = rate;
        }

        if let Ok(burst_str) = env::var("FIREHYDRANT_RATE_BURST")
            && let Ok(burst) = burst_str.parse::<u32>()
        {
            config.rate_limit.burst_size = burst;
        }

        if let Ok(backoff_str) = env::var("FIREHYDRANT_BACKOFF")
            && let Ok(backoff_secs) = backoff_str.parse::<u64>()
        {
            config.backoff = Duration::from_secs(backoff_secs);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.backoff != DEFAULT_BACKOFF {
            self.backoff = other.backoff;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }
        if other.rate_limit != RateLimitConfig::default() {
            self.rate_limit = other.rate_limit;
        }

        self
    }
}

/// Configuration for the shared token bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    /// Steady-state requests per second
    pub requests_per_second: f64,

    /// Burst size for token bucket
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
            burst_size: 10,
        }
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the throttle backoff.
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Set custom rate limiting configuration.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.config.rate_limit = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.backoff, Duration::from_secs(10));
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert!(config.api_key.is_none());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_config_with_api_key() {
        let config = ClientConfig::with_api_key("test-key");
        assert_eq!(
            config.api_key.as_ref().map(|k| k.expose_secret()),
            Some("test-key")
        );
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfigBuilder::new()
            .api_key("test-key")
            .base_url("https://example.com")
            .timeout(Duration::from_secs(5))
            .backoff(Duration::from_millis(250))
            .rate_limit(RateLimitConfig {
                requests_per_second: 2.0,
                burst_size: 4,
            })
            .build();

        assert!(config.api_key.is_some());
        assert_eq!(config.base_url, Some("https://example.com".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.backoff, Duration::from_millis(250));
        assert_eq!(config.rate_limit.burst_size, 4);
    }

    #[test]
    fn test_invalid_default_header() {
        let result = ClientConfigBuilder::new().default_header("bad header", "v");
        assert!(matches!(result, Err(crate::Error::InvalidHeaderName(_))));

        let result = ClientConfigBuilder::new().default_header("x-ok", "bad\nvalue");
        assert!(matches!(result, Err(crate::Error::InvalidHeaderValue(_))));
    }

    #[test]
    fn test_config_merge() {
        let config1 = ClientConfigBuilder::new()
            .api_key("key1")
            .default_header("x-custom", "value1")
            .unwrap()
            .build();
        let config2 = ClientConfigBuilder::new()
            .base_url("https://example.com")
            .timeout(Duration::from_secs(5))
            .default_header("x-other", "value2")
            .unwrap()
            .build();

        let merged = config1.merge(config2);
        assert!(merged.api_key.is_some());
        assert_eq!(merged.base_url, Some("https://example.com".to_string()));
        assert_eq!(merged.timeout, Duration::from_secs(5));
        assert_eq!(merged.backoff, DEFAULT_BACKOFF);
        assert!(merged.default_headers.contains_key("x-custom"));
        assert!(merged.default_headers.contains_key("x-other"));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                ("FIREHYDRANT_API_KEY", Some("env-token")),
                ("FIREHYDRANT_BASE_URL", Some("https://env-base.example/v1/")),
                ("FIREHYDRANT_TIMEOUT", Some("12")),
                ("FIREHYDRANT_RATE_LIMIT", Some("2.5")),
                ("FIREHYDRANT_RATE_BURST", Some("7")),
                ("FIREHYDRANT_BACKOFF", Some("3")),
            ],
            || {
                let config = ClientConfig::from_env().expect("config from env");

                assert_eq!(
                    config.api_key.as_ref().map(|k| k.expose_secret()),
                    Some("env-token")
                );
                assert_eq!(
                    config.base_url,
                    Some("https://env-base.example/v1/".to_string())
                );
                assert_eq!(config.timeout, Duration::from_secs(12));
                assert_eq!(config.rate_limit.requests_per_second, 2.5);
                assert_eq!(config.rate_limit.burst_size, 7);
                assert_eq!(config.backoff, Duration::from_secs(3));
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_ignores_garbage_numbers() {
        temp_env::with_vars(
            [
                ("FIREHYDRANT_TIMEOUT", Some("soon")),
                ("FIREHYDRANT_RATE_BURST", Some("-3")),
                ("FIREHYDRANT_BACKOFF", None),
            ],
            || {
                let config = ClientConfig::from_env().expect("config from env");
                assert_eq!(config.timeout, DEFAULT_TIMEOUT);
                assert_eq!(config.rate_limit.burst_size, 10);
                assert_eq!(config.backoff, DEFAULT_BACKOFF);
            },
        );
    }
}
