//! Error types for stock research operations

use thiserror::Error;

/// Stock research errors
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Blank ticker input
    #[error("Please enter a valid ticker symbol")]
    EmptyTicker,

    /// Ticker contains characters Yahoo never uses, or is too long
    #[error("Invalid ticker symbol: {0}")]
    InvalidTicker(String),

    /// Unknown history range string
    #[error("Invalid history range: {0}")]
    InvalidRange(String),

    /// Collecting market data for a ticker failed
    #[error("Failed to fetch data for {ticker}: {reason}")]
    DataCollection { ticker: String, reason: String },

    /// Data not available for the requested ticker
    #[error("Data not available for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    /// Yahoo Finance rejected or failed the request
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Rate limit exceeded upstream
    #[error("Rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Transport failure reported by a data client that owns its own HTTP stack
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt template error
    #[error(transparent)]
    Prompt(#[from] research_prompt::PromptError),

    /// LLM chain error
    #[error(transparent)]
    Chain(#[from] research_core::Error),
}

impl ResearchError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ResearchError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ResearchError::RateLimited { .. } | ResearchError::Connection(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for stock research operations
pub type Result<T> = std::result::Result<T, ResearchError>;

impl From<research_utils::EnvError> for ResearchError {
    fn from(err: research_utils::EnvError) -> Self {
        ResearchError::Config(err.to_string())
    }
}
