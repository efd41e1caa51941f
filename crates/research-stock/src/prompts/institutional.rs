//! Prompts for the institutional analysis flow

use super::names;
use research_prompt::{PromptBuilder, PromptTemplate, Result};

/// Fundamental analysis from the company snapshot and valuation metrics
pub fn fundamental_prompt() -> Result<PromptTemplate> {
    let text = PromptBuilder::new()
        .line("Perform comprehensive fundamental analysis for {{ ticker }}:")
        .blank_line()
        .section("Company Information")
        .line("{{ info }}")
        .blank_line()
        .section("Valuation Metrics")
        .line("{{ valuation_metrics }}")
        .blank_line()
        .line("Your analysis must include:")
        .numbered([
            "Business Model Analysis (competitive advantages, moat)",
            "Financial Health Assessment (liquidity, solvency)",
            "Growth Prospects (historical and projected)",
            "Valuation Assessment (relative and absolute)",
            "Industry Position and Competitive Landscape",
        ])
        .blank_line()
        .line("Format as a professional research report with clear sections.")
        .build();

    PromptTemplate::new(
        names::FUNDAMENTAL,
        ["ticker", "info", "valuation_metrics"],
        text,
    )
}

/// Technical analysis from the indicators and the price summary table
pub fn technical_prompt() -> Result<PromptTemplate> {
    let text = PromptBuilder::new()
        .line("Perform technical analysis for {{ ticker }}:")
        .blank_line()
        .section("Technical Indicators")
        .line("{{ technical_indicators }}")
        .blank_line()
        .section("Price Data Summary")
        .line("{{ price_data }}")
        .blank_line()
        .line("Analyze:")
        .numbered([
            "Trend Analysis (short, medium, long-term)",
            "Key Support/Resistance Levels",
            "Momentum Indicators Interpretation",
            "Volume Analysis",
            "Chart Patterns",
        ])
        .blank_line()
        .line("Provide specific price levels for entry/exit points.")
        .build();

    PromptTemplate::new(
        names::TECHNICAL,
        ["ticker", "technical_indicators", "price_data"],
        text,
    )
}

/// Recommendation that synthesizes both analyses
pub fn recommendation_prompt() -> Result<PromptTemplate> {
    let text = PromptBuilder::new()
        .line("Generate institutional investment recommendation for {{ ticker }}:")
        .blank_line()
        .section("Fundamental Analysis")
        .line("{{ fundamental_analysis }}")
        .blank_line()
        .section("Technical Analysis")
        .line("{{ technical_analysis }}")
        .blank_line()
        .line("Include:")
        .numbered([
            "Investment Thesis (3-5 key points)",
            "Price Targets (conservative/base/aggressive)",
            "Risk Assessment (systematic/unsystematic risks)",
            "Position Sizing Guidance",
            "Monitoring Criteria",
        ])
        .blank_line()
        .line("Format for a professional investment committee.")
        .build();

    PromptTemplate::new(
        names::RECOMMENDATION,
        ["ticker", "fundamental_analysis", "technical_analysis"],
        text,
    )
}
