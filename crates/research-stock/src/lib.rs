//! Stock research desk
//!
//! This crate turns a ticker symbol into an LLM-written research report. It
//! includes:
//!
//! - Market data from Yahoo Finance (daily history and a fundamentals snapshot)
//! - Technical indicators (moving averages, RSI, MACD, bands, volume)
//! - Valuation metrics grouped by valuation, growth, profitability and health
//! - Prompt templates for the institutional and basic flows
//! - The [`ResearchDesk`] pipeline and terminal formatting of its reports
//!
//! # Architecture
//!
//! Data collection sits behind [`MarketDataSource`] so the pipeline can run
//! against Yahoo, a cache in front of Yahoo, or a fake in tests. The LLM steps
//! are `research_chain` chains over a shared [`research_core::ChainValues`].
//!
//! # Example
//!
//! ```rust,no_run
//! use research_llm::providers::{OpenAIConfig, OpenAIProvider};
//! use research_stock::{ConsoleProgress, ResearchConfig, ResearchDesk, Ticker};
//! use std::sync::Arc;
//!
//! # async fn example() -> research_stock::Result<()> {
//! let config = OpenAIConfig::from_env().map_err(research_core::Error::from)?;
//! let provider = OpenAIProvider::with_config(config).map_err(research_core::Error::from)?;
//! let desk = ResearchDesk::with_yahoo(Arc::new(provider), ResearchConfig::from_env()?)?;
//!
//! let ticker = Ticker::parse("tsla")?;
//! let report = desk.professional_analysis(&ticker, &ConsoleProgress).await?;
//! println!("{}", report.recommendation);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod market;
pub mod prompts;
pub mod ticker;

// Re-export main types for convenience
pub use analysis::{PriceSummary, TechnicalIndicators, ValuationMetrics};
pub use api::YahooFinanceClient;
pub use cache::CachedMarketData;
pub use config::ResearchConfig;
pub use engine::{
    AnalysisMode, BasicReport, BasicSection, ProgressReporter, ResearchDesk, ResearchReport,
    SilentProgress, Stage,
};
pub use error::{ResearchError, Result};
pub use interface::{CliFormatter, ConsoleProgress};
pub use market::{Bar, CompanySnapshot, HistoryRange, MarketData, MarketDataSource};
pub use ticker::Ticker;
