//! Research report types

use crate::analysis::{TechnicalIndicators, ValuationMetrics};
use crate::ticker::Ticker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Result of the professional flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub run_id: Uuid,
    pub ticker: Ticker,
    pub fundamental_analysis: String,
    pub technical_analysis: String,
    pub recommendation: String,
    pub indicators: TechnicalIndicators,
    pub valuation: ValuationMetrics,
    pub generated_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Result of the basic flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicReport {
    pub run_id: Uuid,
    pub ticker: Ticker,
    pub basic_info: String,
    pub research_report: String,
    pub analysis_report: String,
    pub recommendation: String,
    pub generated_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl ResearchReport {
    /// Elapsed wall time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
