//! Computations over collected market data
//!
//! Everything here is deterministic; the values are fed into the prompts.

pub mod describe;
pub mod fundamental;
pub mod technical;

pub use describe::{ColumnStats, PriceSummary};
pub use fundamental::{FinancialHealth, Growth, Profitability, Valuation, ValuationMetrics};
pub use technical::{MacdTrend, RsiSignal, TechnicalIndicators};
