//! Parsing of Yahoo `quoteSummary` responses into [`CompanySnapshot`]
//!
//! Yahoo wraps numbers as `{ "raw": 1.23, "fmt": "1.23" }` and drops modules
//! that do not apply to an instrument, so every lookup is optional.

use crate::error::{ResearchError, Result};
use crate::market::{CompanySnapshot, InstitutionalHolder, RecommendationTrend};
use crate::ticker::Ticker;
use serde_json::Value;

/// Modules requested from the quoteSummary endpoint
pub const MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "assetProfile",
    "recommendationTrend",
    "institutionOwnership",
    "incomeStatementHistory",
];

/// Build a snapshot from a full quoteSummary response body
pub fn parse_snapshot(ticker: &Ticker, body: &Value) -> Result<CompanySnapshot> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| ResearchError::YahooFinance("missing quoteSummary".to_string()))?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(ResearchError::YahooFinance(description.to_string()));
    }

    let result = summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| ResearchError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })?;

    let price = module(result, "price");
    let detail = module(result, "summaryDetail");
    let stats = module(result, "defaultKeyStatistics");
    let financial = module(result, "financialData");
    let profile = module(result, "assetProfile");
    let latest_income = module(result, "incomeStatementHistory")
        .get("incomeStatementHistory")
        .and_then(Value::as_array)
        .and_then(|statements| statements.first())
        .unwrap_or(&Value::Null);

    Ok(CompanySnapshot {
        symbol: ticker.to_string(),
        long_name: text(price, "longName").or_else(|| text(price, "shortName")),
        sector: text(profile, "sector"),
        industry: text(profile, "industry"),
        business_summary: text(profile, "longBusinessSummary"),
        full_time_employees: number(profile, "fullTimeEmployees").map(|n| n as u64),
        market_cap: number(price, "marketCap").or_else(|| number(detail, "marketCap")),
        current_price: number(financial, "currentPrice")
            .or_else(|| number(price, "regularMarketPrice")),
        fifty_two_week_high: number(detail, "fiftyTwoWeekHigh"),
        fifty_two_week_low: number(detail, "fiftyTwoWeekLow"),
        average_volume: number(detail, "averageVolume"),
        trailing_pe: number(detail, "trailingPE"),
        forward_pe: number(detail, "forwardPE").or_else(|| number(stats, "forwardPE")),
        peg_ratio: number(stats, "pegRatio"),
        price_to_sales: number(detail, "priceToSalesTrailing12Months"),
        price_to_book: number(stats, "priceToBook"),
        ev_to_ebitda: number(stats, "enterpriseToEbitda"),
        revenue_growth: number(financial, "revenueGrowth"),
        earnings_growth: number(financial, "earningsGrowth"),
        ebitda_growth: number(financial, "ebitdaGrowth"),
        gross_margins: number(financial, "grossMargins"),
        operating_margins: number(financial, "operatingMargins"),
        profit_margins: number(financial, "profitMargins"),
        return_on_equity: number(financial, "returnOnEquity"),
        return_on_assets: number(financial, "returnOnAssets"),
        current_ratio: number(financial, "currentRatio"),
        quick_ratio: number(financial, "quickRatio"),
        debt_to_equity: number(financial, "debtToEquity"),
        ebit: number(latest_income, "ebit"),
        interest_expense: number(latest_income, "interestExpense"),
        recommendation_trend: recommendation_trend(module(result, "recommendationTrend")),
        institutional_holders: institutional_holders(module(result, "institutionOwnership")),
    })
}

fn module<'a>(result: &'a Value, name: &str) -> &'a Value {
    result.get(name).unwrap_or(&Value::Null)
}

/// Read `{ "raw": n }` or a bare number
fn number(module: &Value, key: &str) -> Option<f64> {
    let value = module.get(key)?;
    value
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| value.as_f64())
}

fn text(module: &Value, key: &str) -> Option<String> {
    module
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn count(entry: &Value, key: &str) -> u32 {
    number(entry, key).map_or(0, |n| n as u32)
}

fn recommendation_trend(module: &Value) -> Vec<RecommendationTrend> {
    module
        .get("trend")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    Some(RecommendationTrend {
                        period: text(entry, "period")?,
                        strong_buy: count(entry, "strongBuy"),
                        buy: count(entry, "buy"),
                        hold: count(entry, "hold"),
                        sell: count(entry, "sell"),
                        strong_sell: count(entry, "strongSell"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn institutional_holders(module: &Value) -> Vec<InstitutionalHolder> {
    module
        .get("ownershipList")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    Some(InstitutionalHolder {
                        organization: text(entry, "organization")?,
                        pct_held: number(entry, "pctHeld"),
                        shares: number(entry, "position"),
                        value: number(entry, "value"),
                        report_date: entry
                            .get("reportDate")
                            .and_then(|d| d.get("fmt"))
                            .and_then(Value::as_str)
                            .map(String::from),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
