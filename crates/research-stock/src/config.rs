//! Configuration for research runs

use crate::error::{ResearchError, Result};
use crate::market::HistoryRange;
use research_chain::LlmSettings;
use research_utils::{env_or, env_parse};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Groq model
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Configuration for the research desk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Chat model used for every analysis step
    pub model: String,

    /// Sampling temperature (0.0..=2.0)
    pub temperature: f32,

    /// Maximum tokens per completion
    pub max_tokens: usize,

    /// Price history lookback
    pub history_range: HistoryRange,

    /// Request timeout for market data calls
    pub request_timeout: Duration,

    /// Maximum attempts for market data calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Cache TTL for price history
    pub cache_ttl_history: Duration,

    /// Cache TTL for company snapshots
    pub cache_ttl_fundamentals: Duration,

    /// Yahoo Finance requests allowed per minute
    pub yahoo_requests_per_minute: u32,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            history_range: HistoryRange::OneYear,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            cache_ttl_history: Duration::from_secs(300),     // 5 minutes
            cache_ttl_fundamentals: Duration::from_secs(3600), // 1 hour
            yahoo_requests_per_minute: 60,
        }
    }
}

impl ResearchConfig {
    /// Create a new configuration builder
    pub fn builder() -> ResearchConfigBuilder {
        ResearchConfigBuilder::default()
    }

    /// Defaults overridden by `RESEARCH_MODEL`, `RESEARCH_TEMPERATURE` and
    /// `RESEARCH_MAX_TOKENS`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Self::builder()
            .model(env_or("RESEARCH_MODEL", &defaults.model))
            .temperature(env_parse("RESEARCH_TEMPERATURE", defaults.temperature)?)
            .max_tokens(env_parse("RESEARCH_MAX_TOKENS", defaults.max_tokens)?)
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ResearchError::Config("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ResearchError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ResearchError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(ResearchError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.yahoo_requests_per_minute == 0 {
            return Err(ResearchError::Config(
                "yahoo_requests_per_minute must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Model parameters for the LLM chains
    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings::new(&self.model, self.max_tokens, self.temperature)
    }
}

/// Builder for ResearchConfig
#[derive(Debug, Default)]
pub struct ResearchConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    history_range: Option<HistoryRange>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    cache_ttl_history: Option<Duration>,
    cache_ttl_fundamentals: Option<Duration>,
    yahoo_requests_per_minute: Option<u32>,
}

impl ResearchConfigBuilder {
    /// Set the chat model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the price history lookback
    pub fn history_range(mut self, range: HistoryRange) -> Self {
        self.history_range = Some(range);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set cache TTL for price history
    pub fn cache_ttl_history(mut self, duration: Duration) -> Self {
        self.cache_ttl_history = Some(duration);
        self
    }

    /// Set cache TTL for company snapshots
    pub fn cache_ttl_fundamentals(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamentals = Some(duration);
        self
    }

    /// Set the Yahoo Finance request quota
    pub fn yahoo_requests_per_minute(mut self, quota: u32) -> Self {
        self.yahoo_requests_per_minute = Some(quota);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ResearchConfig> {
        let defaults = ResearchConfig::default();

        let config = ResearchConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            cache_ttl_history: self.cache_ttl_history.unwrap_or(defaults.cache_ttl_history),
            cache_ttl_fundamentals: self
                .cache_ttl_fundamentals
                .unwrap_or(defaults.cache_ttl_fundamentals),
            yahoo_requests_per_minute: self
                .yahoo_requests_per_minute
                .unwrap_or(defaults.yahoo_requests_per_minute),
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
        let config = ResearchConfig::default();
        assert_eq!(config.model, "llama3-70b-8192");
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.history_range, HistoryRange::OneYear);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ResearchConfig::builder()
            .model("mixtral-8x7b-32768")
            .temperature(0.7)
            .max_retries(5)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_validation() {
        assert!(ResearchConfig::builder().temperature(2.5).build().is_err());
        assert!(ResearchConfig::builder().temperature(-0.1).build().is_err());
        assert!(ResearchConfig::builder().max_tokens(0).build().is_err());
        assert!(ResearchConfig::builder().max_retries(0).build().is_err());
        assert!(ResearchConfig::builder().model("  ").build().is_err());
        assert!(
            ResearchConfig::builder()
                .yahoo_requests_per_minute(0)
                .build()
                .is_err()
        );
        assert!(ResearchConfig::builder().temperature(2.0).build().is_ok());
    }

    #[test]
    fn test_llm_settings() {
        let settings = ResearchConfig::default().llm_settings();
        assert_eq!(settings.model, "llama3-70b-8192");
        assert_eq!(settings.max_tokens, 4096);
    }

    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var("RESEARCH_MODEL", "llama-3.1-8b-instant");
            std::env::set_var("RESEARCH_TEMPERATURE", "0.5");
            std::env::remove_var("RESEARCH_MAX_TOKENS");
        }

        let config = ResearchConfig::from_env().unwrap();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 4096);

        unsafe {
            std::env::set_var("RESEARCH_TEMPERATURE", "warm");
        }
        assert!(matches!(
            ResearchConfig::from_env(),
            Err(ResearchError::Config(_))
        ));

        unsafe {
            std::env::remove_var("RESEARCH_MODEL");
            std::env::remove_var("RESEARCH_TEMPERATURE");
        }
    }
}
