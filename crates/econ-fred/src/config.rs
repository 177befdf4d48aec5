//! Configuration for FRED retrieval and analysis

use crate::error::{FredError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for FRED retrieval and downstream analysis
///
/// The API key is an explicit field: nothing below the binary boundary
/// reads the environment. `with_env_api_key` exists as an opt-in
/// convenience for the CLI only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconConfig {
    /// FRED API key
    pub api_key: String,

    /// Requests per minute allowed against the FRED API
    pub rate_limit: u32,

    /// Cache TTL for series data
    pub cache_ttl: Duration,

    /// Maximum number of attempts per series retrieval
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum number of search results to consider
    pub search_limit: u32,

    /// Number of recent observations shown in rendered reports
    pub recent_points: usize,

    /// Maximum number of series analyzed per query
    pub max_series: usize,
}

impl Default for EconConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            rate_limit: 120,
            cache_ttl: Duration::from_secs(3600), // 1 hour
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            search_limit: 10,
            recent_points: 15,
            max_series: 5,
        }
    }
}

impl EconConfig {
    /// Create a new configuration builder
    pub fn builder() -> EconConfigBuilder {
        EconConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(FredError::Config(
                "FRED API key is required".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(FredError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.max_series == 0 {
            return Err(FredError::Config(
                "max_series must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get retry backoff duration for attempt number
    ///
    /// Saturates rather than overflowing for very large attempt counts.
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

/// Builder for EconConfig
#[derive(Debug, Default)]
pub struct EconConfigBuilder {
    api_key: Option<String>,
    rate_limit: Option<u32>,
    cache_ttl: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    request_timeout: Option<Duration>,
    search_limit: Option<u32>,
    recent_points: Option<usize>,
    max_series: Option<usize>,
}

impl EconConfigBuilder {
    /// Set the FRED API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Load the FRED API key from the FRED_API_KEY environment variable
    ///
    /// Intended for the binary boundary only; library code receives the
    /// key through the built config.
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("FRED_API_KEY") {
            self.api_key = Some(key);
        }
        self
    }

    /// Set requests per minute
    pub fn rate_limit(mut self, limit: u32) -> Self {
        self.rate_limit = Some(limit);
        self
    }

    /// Set cache TTL for series data
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set maximum retries per series retrieval
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the maximum number of search results
    pub fn search_limit(mut self, limit: u32) -> Self {
        self.search_limit = Some(limit);
        self
    }

    /// Set the number of recent observations shown in reports
    pub fn recent_points(mut self, points: usize) -> Self {
        self.recent_points = Some(points);
        self
    }

    /// Set the maximum number of series analyzed per query
    pub fn max_series(mut self, max: usize) -> Self {
        self.max_series = Some(max);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EconConfig> {
        let defaults = EconConfig::default();

        let config = EconConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            rate_limit: self.rate_limit.unwrap_or(defaults.rate_limit),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self
                .retry_backoff_base
                .unwrap_or(defaults.retry_backoff_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            search_limit: self.search_limit.unwrap_or(defaults.search_limit),
            recent_points: self.recent_points.unwrap_or(defaults.recent_points),
            max_series: self.max_series.unwrap_or(defaults.max_series),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EconConfig::default();
        assert_eq!(config.rate_limit, 120);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.search_limit, 10);
        // Default has no API key, so validation fails until one is set
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = EconConfig::builder()
            .api_key("test_key")
            .max_retries(5)
            .request_timeout(Duration::from_secs(60))
            .max_series(3)
            .build()
            .expect("valid config");

        assert_eq!(config.api_key, "test_key");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.max_series, 3);
    }

    #[test]
    fn test_validation_requires_api_key() {
        let result = EconConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_retries() {
        let result = EconConfig::builder().api_key("k").max_retries(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_retry_backoff() {
        let config = EconConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        assert_eq!(config.retry_backoff(0), Duration::from_secs(1));
        assert_eq!(config.retry_backoff(1), Duration::from_secs(2));
        assert_eq!(config.retry_backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_backoff_saturates_for_large_attempts() {
        let config = EconConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.retry_backoff(40),
            Duration::from_secs(u64::from(u32::MAX))
        );
        assert!(config.retry_backoff(200) >= config.retry_backoff(10));
    }
}
