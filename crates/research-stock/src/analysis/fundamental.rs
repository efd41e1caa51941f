//! Valuation metrics extracted from a company snapshot

use crate::error::Result;
use crate::market::CompanySnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub price_to_book: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub ebitda_growth: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profitability {
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealth {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub interest_coverage: Option<f64>,
}

/// Ratios grouped the way the fundamental prompt presents them
///
/// Missing inputs stay `None` and serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationMetrics {
    pub valuation: Valuation,
    pub growth: Growth,
    pub profitability: Profitability,
    pub financial_health: FinancialHealth,
}

impl ValuationMetrics {
    pub fn from_snapshot(snapshot: &CompanySnapshot) -> Self {
        Self {
            valuation: Valuation {
                pe_ratio: snapshot.trailing_pe,
                forward_pe: snapshot.forward_pe,
                peg_ratio: snapshot.peg_ratio,
                price_to_sales: snapshot.price_to_sales,
                price_to_book: snapshot.price_to_book,
                ev_to_ebitda: snapshot.ev_to_ebitda,
            },
            growth: Growth {
                revenue_growth: snapshot.revenue_growth,
                earnings_growth: snapshot.earnings_growth,
                ebitda_growth: snapshot.ebitda_growth,
            },
            profitability: Profitability {
                gross_margins: snapshot.gross_margins,
                operating_margins: snapshot.operating_margins,
                profit_margins: snapshot.profit_margins,
                return_on_equity: snapshot.return_on_equity,
                return_on_assets: snapshot.return_on_assets,
            },
            financial_health: FinancialHealth {
                current_ratio: snapshot.current_ratio,
                quick_ratio: snapshot.quick_ratio,
                debt_to_equity: snapshot.debt_to_equity,
                interest_coverage: interest_coverage(snapshot.ebit, snapshot.interest_expense),
            },
        }
    }

    /// Pretty JSON for the prompt
    pub fn to_prompt_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// EBIT over the absolute interest expense
///
/// Yahoo reports interest expense as a negative number on some statements.
fn interest_coverage(ebit: Option<f64>, interest_expense: Option<f64>) -> Option<f64> {
    match (ebit, interest_expense) {
        (Some(ebit), Some(expense)) if expense != 0.0 => Some(ebit / expense.abs()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::Ticker;

    fn snapshot() -> CompanySnapshot {
        CompanySnapshot {
            trailing_pe: Some(70.23),
            forward_pe: Some(85.1),
            revenue_growth: Some(0.078),
            gross_margins: Some(0.18),
            current_ratio: Some(1.84),
            debt_to_equity: Some(18.08),
            ebit: Some(8_891_000_000.0),
            interest_expense: Some(-156_000_000.0),
            ..CompanySnapshot::new(&Ticker::parse("TSLA").unwrap())
        }
    }

    #[test]
    fn test_fields_map_from_snapshot() {
        let metrics = ValuationMetrics::from_snapshot(&snapshot());

        assert_eq!(metrics.valuation.pe_ratio, Some(70.23));
        assert_eq!(metrics.valuation.forward_pe, Some(85.1));
        assert_eq!(metrics.valuation.peg_ratio, None);
        assert_eq!(metrics.growth.revenue_growth, Some(0.078));
        assert_eq!(metrics.profitability.gross_margins, Some(0.18));
        assert_eq!(metrics.financial_health.current_ratio, Some(1.84));
    }

    #[test]
    fn test_interest_coverage() {
        let coverage = ValuationMetrics::from_snapshot(&snapshot())
            .financial_health
            .interest_coverage
            .unwrap();
        assert!((coverage - 8_891.0 / 156.0).abs() < 1e-9);

        assert_eq!(interest_coverage(Some(10.0), Some(0.0)), None);
        assert_eq!(interest_coverage(None, Some(5.0)), None);
        assert_eq!(interest_coverage(Some(10.0), None), None);
        assert_eq!(interest_coverage(Some(10.0), Some(4.0)), Some(2.5));
    }

    #[test]
    fn test_prompt_json_keeps_nulls() {
        let json = ValuationMetrics::from_snapshot(&snapshot())
            .to_prompt_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["valuation"]["pe_ratio"], 70.23);
        assert!(value["valuation"]["peg_ratio"].is_null());
        assert!(value["growth"]["ebitda_growth"].is_null());
        assert!(value["financial_health"]["interest_coverage"].is_number());
    }
}
