//! Market data model and the data source seam
//!
//! A research run needs two things per ticker: a daily price history and a
//! company snapshot (the fundamentals Yahoo reports for the quote page).

use crate::error::{ResearchError, Result};
use crate::ticker::Ticker;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Lookback window for price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryRange {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl HistoryRange {
    /// Range string as Yahoo spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneDay => "1d",
            HistoryRange::FiveDays => "5d",
            HistoryRange::OneMonth => "1mo",
            HistoryRange::ThreeMonths => "3mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
            HistoryRange::TwoYears => "2y",
            HistoryRange::FiveYears => "5y",
            HistoryRange::TenYears => "10y",
            HistoryRange::YearToDate => "ytd",
            HistoryRange::Max => "max",
        }
    }

    /// First instant covered by the range, counting back from `end`
    pub fn start_from(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            HistoryRange::OneDay => 1,
            HistoryRange::FiveDays => 5,
            HistoryRange::OneMonth => 30,
            HistoryRange::ThreeMonths => 90,
            HistoryRange::SixMonths => 180,
            HistoryRange::OneYear => 365,
            HistoryRange::TwoYears => 730,
            HistoryRange::FiveYears => 1825,
            HistoryRange::TenYears => 3650,
            HistoryRange::Max => 36500,
            HistoryRange::YearToDate => {
                return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map_or(end, |start| start.and_utc());
            }
        };
        end - Duration::days(days)
    }
}

impl FromStr for HistoryRange {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "1d" => HistoryRange::OneDay,
            "5d" => HistoryRange::FiveDays,
            "1mo" => HistoryRange::OneMonth,
            "3mo" => HistoryRange::ThreeMonths,
            "6mo" => HistoryRange::SixMonths,
            "1y" => HistoryRange::OneYear,
            "2y" => HistoryRange::TwoYears,
            "5y" => HistoryRange::FiveYears,
            "10y" => HistoryRange::TenYears,
            "ytd" => HistoryRange::YearToDate,
            "max" => HistoryRange::Max,
            other => return Err(ResearchError::InvalidRange(other.to_string())),
        })
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// Analyst rating counts for one period (`0m` = current month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTrend {
    pub period: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

/// A top institutional shareholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalHolder {
    pub organization: String,
    pub pct_held: Option<f64>,
    pub shares: Option<f64>,
    pub value: Option<f64>,
    pub report_date: Option<String>,
}

/// Company fundamentals as reported on the quote page
///
/// Every field is optional; Yahoo omits whatever does not apply (ETFs have
/// no margins, recent IPOs have no trailing P/E).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub symbol: String,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub business_summary: Option<String>,
    pub full_time_employees: Option<u64>,
    pub market_cap: Option<f64>,
    pub current_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub price_to_book: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub ebitda_growth: Option<f64>,
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub ebit: Option<f64>,
    pub interest_expense: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendation_trend: Vec<RecommendationTrend>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub institutional_holders: Vec<InstitutionalHolder>,
}

impl CompanySnapshot {
    /// Empty snapshot for a ticker
    pub fn new(ticker: &Ticker) -> Self {
        Self {
            symbol: ticker.to_string(),
            ..Default::default()
        }
    }

    /// Snapshot as pretty JSON, omitting absent fields
    pub fn to_prompt_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.retain(|_, v| !v.is_null());
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Everything collected for one ticker
#[derive(Debug, Clone)]
pub struct MarketData {
    pub snapshot: CompanySnapshot,
    pub history: Vec<Bar>,
}

/// Source of price history and company snapshots
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars covering `range`, oldest first
    async fn history(&self, ticker: &Ticker, range: HistoryRange) -> Result<Vec<Bar>>;

    /// Company fundamentals snapshot
    async fn snapshot(&self, ticker: &Ticker) -> Result<CompanySnapshot>;
}

/// Collect the snapshot and history for a ticker
///
/// Source failures are reported as [`ResearchError::DataCollection`]; an
/// empty history as [`ResearchError::DataUnavailable`].
pub async fn collect(
    source: &dyn MarketDataSource,
    ticker: &Ticker,
    range: HistoryRange,
) -> Result<MarketData> {
    let wrap = |e: ResearchError| ResearchError::DataCollection {
        ticker: ticker.to_string(),
        reason: e.to_string(),
    };

    let (snapshot, history) = tokio::try_join!(
        async { source.snapshot(ticker).await.map_err(wrap) },
        async { source.history(ticker, range).await.map_err(wrap) },
    )?;

    if history.is_empty() {
        return Err(ResearchError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("no price history for range {range}"),
        });
    }

    debug!(%ticker, bars = history.len(), "Collected market data");
    Ok(MarketData { snapshot, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct StaticSource {
        bars: Vec<Bar>,
        fail_snapshot: bool,
    }

    #[async_trait]
    impl MarketDataSource for StaticSource {
        async fn history(&self, _ticker: &Ticker, _range: HistoryRange) -> Result<Vec<Bar>> {
            Ok(self.bars.clone())
        }

        async fn snapshot(&self, ticker: &Ticker) -> Result<CompanySnapshot> {
            if self.fail_snapshot {
                return Err(ResearchError::YahooFinance(
                    "Quote not found for ticker symbol: ZZZZ".to_string(),
                ));
            }
            Ok(CompanySnapshot::new(ticker))
        }
    }

    fn bar(close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
            adjclose: close,
        }
    }

    #[test]
    fn test_range_parsing() {
        assert_eq!("1y".parse::<HistoryRange>().unwrap(), HistoryRange::OneYear);
        assert_eq!("ytd".parse::<HistoryRange>().unwrap(), HistoryRange::YearToDate);
        assert_eq!(HistoryRange::FiveYears.to_string(), "5y");
        assert!(matches!(
            "7w".parse::<HistoryRange>(),
            Err(ResearchError::InvalidRange(ref r)) if r == "7w"
        ));
    }

    #[test]
    fn test_range_start() {
        let end = Utc.with_ymd_and_hms(2024, 10, 18, 12, 0, 0).unwrap();
        assert_eq!(
            HistoryRange::OneYear.start_from(end),
            Utc.with_ymd_and_hms(2023, 10, 19, 12, 0, 0).unwrap()
        );
        assert_eq!(
            HistoryRange::YearToDate.start_from(end),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_snapshot_prompt_json_skips_missing() {
        let mut snapshot = CompanySnapshot::new(&Ticker::parse("TSLA").unwrap());
        snapshot.long_name = Some("Tesla, Inc.".to_string());

        let json = snapshot.to_prompt_json().unwrap();
        assert!(json.contains("\"long_name\": \"Tesla, Inc.\""));
        assert!(!json.contains("trailing_pe"));
        assert!(!json.contains("recommendation_trend"));
    }

    #[tokio::test]
    async fn test_collect() {
        let source = StaticSource {
            bars: vec![bar(250.0), bar(251.0)],
            fail_snapshot: false,
        };
        let ticker = Ticker::parse("TSLA").unwrap();

        let data = collect(&source, &ticker, HistoryRange::OneYear).await.unwrap();
        assert_eq!(data.history.len(), 2);
        assert_eq!(data.snapshot.symbol, "TSLA");
    }

    #[tokio::test]
    async fn test_collect_wraps_failures() {
        let source = StaticSource {
            bars: vec![bar(250.0)],
            fail_snapshot: true,
        };
        let ticker = Ticker::parse("ZZZZ").unwrap();

        let err = collect(&source, &ticker, HistoryRange::OneYear)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch data for ZZZZ: Yahoo Finance error: Quote not found for ticker symbol: ZZZZ"
        );
    }

    #[tokio::test]
    async fn test_collect_empty_history() {
        let source = StaticSource {
            bars: Vec::new(),
            fail_snapshot: false,
        };
        let ticker = Ticker::parse("TSLA").unwrap();

        let err = collect(&source, &ticker, HistoryRange::OneYear)
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::DataUnavailable { .. }));
    }
}
