//! Prompts for the basic analysis flow

use super::names;
use research_prompt::{PromptBuilder, PromptTemplate, Result};

pub fn research_prompt() -> Result<PromptTemplate> {
    let text = PromptBuilder::new()
        .line("Analyze the following stock ticker: {{ ticker }}")
        .blank_line()
        .section("Stock Data")
        .line("{{ stock_data }}")
        .blank_line()
        .line("Provide a comprehensive overview including:")
        .numbered([
            "Company description",
            "Key financial metrics",
            "Recent performance",
            "Industry position",
        ])
        .build();

    PromptTemplate::new(names::BASIC_RESEARCH, ["ticker", "stock_data"], text)
}

pub fn analysis_prompt() -> Result<PromptTemplate> {
    let text = PromptBuilder::new()
        .line("Based on this research report for {{ ticker }}:")
        .line("{{ research_report }}")
        .blank_line()
        .line("Perform detailed analysis covering:")
        .numbered([
            "Valuation assessment",
            "Growth prospects",
            "Risk factors",
            "Competitive advantages",
        ])
        .build();

    PromptTemplate::new(names::BASIC_ANALYSIS, ["ticker", "research_report"], text)
}

pub fn recommendation_prompt() -> Result<PromptTemplate> {
    let text = PromptBuilder::new()
        .line("For stock {{ ticker }}, synthesize this information:")
        .blank_line()
        .section("RESEARCH SUMMARY")
        .line("{{ research_report }}")
        .blank_line()
        .section("ANALYSIS FINDINGS")
        .line("{{ analysis_report }}")
        .blank_line()
        .line("Generate an investment recommendation covering:")
        .numbered([
            "Investment thesis",
            "Price targets",
            "Risk/reward assessment",
            "Suggested position size",
        ])
        .build();

    PromptTemplate::new(
        names::BASIC_RECOMMENDATION,
        ["ticker", "research_report", "analysis_report"],
        text,
    )
}
