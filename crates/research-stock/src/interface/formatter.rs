//! Response formatting utilities

use crate::engine::{AnalysisMode, BasicReport, BasicSection, ResearchReport, Stage};
use crate::market::CompanySnapshot;
use crate::ticker::Ticker;

const RULE_WIDTH: usize = 80;

/// Group the integer part of `value` in thousands: `1234567.8` → `1,234,568`
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

/// The basic information block: one `Label: value` line per field
pub fn format_basic_info(snapshot: &CompanySnapshot) -> String {
    let price = |value: Option<f64>| or_na(value.map(|v| format!("${v:.2}")));

    let lines = [
        ("Name", or_na(snapshot.long_name.clone())),
        ("Sector", or_na(snapshot.sector.clone())),
        ("Industry", or_na(snapshot.industry.clone())),
        (
            "Market Cap",
            or_na(snapshot.market_cap.map(|v| format!("${}", group_thousands(v)))),
        ),
        ("Current Price", price(snapshot.current_price)),
        ("52 Week High", price(snapshot.fifty_two_week_high)),
        ("52 Week Low", price(snapshot.fifty_two_week_low)),
        ("Average Volume", or_na(snapshot.average_volume.map(group_thousands))),
    ];

    lines
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terminal layout of reports and captions
pub struct CliFormatter;

impl CliFormatter {
    fn rule() -> String {
        "=".repeat(RULE_WIDTH)
    }

    /// Caption printed when a run begins
    pub fn format_start(ticker: &Ticker, mode: AnalysisMode) -> String {
        match mode {
            AnalysisMode::Professional => {
                format!("\n🏦 Initiating Professional Analysis for {ticker}...")
            }
            AnalysisMode::Basic => format!("\n🔍 Analyzing {ticker}...\n"),
        }
    }

    pub fn format_stage(stage: Stage) -> String {
        if stage.opens_block() {
            format!("\n{}", stage.caption())
        } else {
            stage.caption().to_string()
        }
    }

    pub fn format_report(report: &ResearchReport) -> String {
        let rule = Self::rule();
        format!(
            "\n{rule}\n\
             🏛️  INSTITUTIONAL RESEARCH REPORT: {ticker}\n\
             {rule}\n\
             \n⭐ FUNDAMENTAL ANALYSIS:\n{fundamental}\n\
             \n📈 TECHNICAL ANALYSIS:\n{technical}\n\
             \n💎 INVESTMENT RECOMMENDATION:\n{recommendation}\n\
             \n{rule}\n\
             ⏱️  Analysis completed in {elapsed:.2} seconds",
            ticker = report.ticker,
            fundamental = report.fundamental_analysis,
            technical = report.technical_analysis,
            recommendation = report.recommendation,
            elapsed = report.elapsed_secs(),
        )
    }

    /// One section of the basic flow; all but the first open with a blank line
    pub fn format_section(section: BasicSection, text: &str) -> String {
        match section {
            BasicSection::BasicInfo => format!("{}\n{text}", section.heading()),
            _ => format!("\n{}\n{text}", section.heading()),
        }
    }

    pub fn format_basic_report(report: &BasicReport) -> String {
        [
            (BasicSection::BasicInfo, &report.basic_info),
            (BasicSection::Research, &report.research_report),
            (BasicSection::Analysis, &report.analysis_report),
            (BasicSection::Recommendation, &report.recommendation),
        ]
        .iter()
        .map(|(section, text)| Self::format_section(*section, text))
        .collect::<Vec<_>>()
        .join("\n")
    }

    /// Per-ticker failure line for the given mode
    pub fn format_error(mode: AnalysisMode, error: &impl std::fmt::Display) -> String {
        match mode {
            AnalysisMode::Professional => format!("\n❌ Professional analysis failed: {error}"),
            AnalysisMode::Basic => format!("Error analyzing stock: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{TechnicalIndicators, ValuationMetrics};
    use chrono::Utc;
    use std::time::Duration;
    use uuid::Uuid;

    fn tsla() -> Ticker {
        Ticker::parse("TSLA").unwrap()
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(96_532_611.0), "96,532,611");
        assert_eq!(group_thousands(802_000_000_000.0), "802,000,000,000");
        assert_eq!(group_thousands(1_234.6), "1,235");
        assert_eq!(group_thousands(-1_500_000.0), "-1,500,000");
    }

    #[test]
    fn test_basic_info() {
        let snapshot = CompanySnapshot {
            long_name: Some("Tesla, Inc.".to_string()),
            sector: Some("Consumer Cyclical".to_string()),
            market_cap: Some(802_000_000_000.0),
            current_price: Some(251.444),
            fifty_two_week_high: Some(278.98),
            average_volume: Some(96_532_611.0),
            ..CompanySnapshot::new(&tsla())
        };

        assert_eq!(
            format_basic_info(&snapshot),
            "Name: Tesla, Inc.\n\
             Sector: Consumer Cyclical\n\
             Industry: N/A\n\
             Market Cap: $802,000,000,000\n\
             Current Price: $251.44\n\
             52 Week High: $278.98\n\
             52 Week Low: N/A\n\
             Average Volume: 96,532,611"
        );
    }

    #[test]
    fn test_captions() {
        assert_eq!(
            CliFormatter::format_start(&tsla(), AnalysisMode::Professional),
            "\n🏦 Initiating Professional Analysis for TSLA..."
        );
        assert_eq!(
            CliFormatter::format_start(&tsla(), AnalysisMode::Basic),
            "\n🔍 Analyzing TSLA...\n"
        );
        assert_eq!(
            CliFormatter::format_stage(Stage::CollectingData),
            "\n📊 Collecting comprehensive data..."
        );
        assert_eq!(
            CliFormatter::format_stage(Stage::AnalyzingFundamentals),
            "💼 Analyzing fundamentals..."
        );
    }

    #[test]
    fn test_report_layout() {
        let report = ResearchReport {
            run_id: Uuid::new_v4(),
            ticker: tsla(),
            fundamental_analysis: "Strong balance sheet.".to_string(),
            technical_analysis: "Price above SMA 50.".to_string(),
            recommendation: "Accumulate.".to_string(),
            indicators: TechnicalIndicators {
                sma_50: None,
                sma_200: None,
                rsi: None,
                macd: 0.0,
                signal: 0.0,
                upper_band: None,
                lower_band: None,
                volume_avg: 0.0,
            },
            valuation: ValuationMetrics::default(),
            generated_at: Utc::now(),
            elapsed: Duration::from_millis(12_340),
        };

        let text = CliFormatter::format_report(&report);
        let rule = "=".repeat(80);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], rule);
        assert_eq!(lines[2], "🏛️  INSTITUTIONAL RESEARCH REPORT: TSLA");
        assert_eq!(lines[3], rule);
        assert!(text.contains("\n\n⭐ FUNDAMENTAL ANALYSIS:\nStrong balance sheet.\n"));
        assert!(text.contains("\n\n📈 TECHNICAL ANALYSIS:\nPrice above SMA 50.\n"));
        assert!(text.contains("\n\n💎 INVESTMENT RECOMMENDATION:\nAccumulate.\n"));
        assert!(text.ends_with(&format!("{rule}\n⏱️  Analysis completed in 12.34 seconds")));
    }

    #[test]
    fn test_basic_report_layout() {
        let report = BasicReport {
            run_id: Uuid::new_v4(),
            ticker: tsla(),
            basic_info: "Name: Tesla, Inc.".to_string(),
            research_report: "R".to_string(),
            analysis_report: "A".to_string(),
            recommendation: "Buy".to_string(),
            generated_at: Utc::now(),
            elapsed: Duration::from_secs(3),
        };

        assert_eq!(
            CliFormatter::format_basic_report(&report),
            "📊 Basic Information:\nName: Tesla, Inc.\n\n📝 Research Report:\nR\n\n📈 Detailed Analysis:\nA\n\n💡 Investment Recommendation:\nBuy"
        );
    }

    #[test]
    fn test_sections() {
        assert_eq!(
            CliFormatter::format_section(BasicSection::BasicInfo, "Name: Tesla, Inc."),
            "📊 Basic Information:\nName: Tesla, Inc."
        );
        assert_eq!(
            CliFormatter::format_section(BasicSection::Recommendation, "Hold"),
            "\n💡 Investment Recommendation:\nHold"
        );
    }

    #[test]
    fn test_error_lines() {
        assert_eq!(
            CliFormatter::format_error(AnalysisMode::Basic, &"boom"),
            "Error analyzing stock: boom"
        );
        assert_eq!(
            CliFormatter::format_error(AnalysisMode::Professional, &"boom"),
            "\n❌ Professional analysis failed: boom"
        );
    }
}
