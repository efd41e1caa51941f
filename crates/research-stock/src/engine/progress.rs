//! Progress reporting for research runs

use super::desk::{ANALYSIS_REPORT, RECOMMENDATION, RESEARCH_REPORT};
use crate::ticker::Ticker;
use research_chain::ChainObserver;
use research_core::ChainValues;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Which research flow to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Fundamental, technical and recommendation reports
    #[default]
    Professional,
    /// Basic info block, research, analysis and recommendation
    Basic,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Professional => "professional",
            AnalysisMode::Basic => "basic",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" | "institutional" => Ok(AnalysisMode::Professional),
            "basic" => Ok(AnalysisMode::Basic),
            other => Err(format!("unknown analysis mode: {other}")),
        }
    }
}

/// Stages of the professional flow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CollectingData,
    CalculatingIndicators,
    AnalyzingFundamentals,
    FundamentalAnalysis,
    TechnicalAnalysis,
    Recommendation,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::CollectingData,
        Stage::CalculatingIndicators,
        Stage::AnalyzingFundamentals,
        Stage::FundamentalAnalysis,
        Stage::TechnicalAnalysis,
        Stage::Recommendation,
    ];

    /// Console caption announcing the stage
    pub fn caption(&self) -> &'static str {
        match self {
            Stage::CollectingData => "📊 Collecting comprehensive data...",
            Stage::CalculatingIndicators => "📈 Calculating technical indicators...",
            Stage::AnalyzingFundamentals => "💼 Analyzing fundamentals...",
            Stage::FundamentalAnalysis => "🔍 Conducting fundamental analysis...",
            Stage::TechnicalAnalysis => "📊 Performing technical analysis...",
            Stage::Recommendation => "💡 Formulating recommendation...",
        }
    }

    /// Whether the caption is set off from the previous output by a blank line
    pub fn opens_block(&self) -> bool {
        !matches!(
            self,
            Stage::CalculatingIndicators | Stage::AnalyzingFundamentals
        )
    }

    /// Stage driven by the chain step of the same name
    pub fn for_step(step: &str) -> Option<Stage> {
        match step {
            "fundamental" => Some(Stage::FundamentalAnalysis),
            "technical" => Some(Stage::TechnicalAnalysis),
            "recommendation" => Some(Stage::Recommendation),
            _ => None,
        }
    }
}

/// Sections of the basic flow, printed as each one becomes available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicSection {
    BasicInfo,
    Research,
    Analysis,
    Recommendation,
}

impl BasicSection {
    pub fn heading(&self) -> &'static str {
        match self {
            BasicSection::BasicInfo => "📊 Basic Information:",
            BasicSection::Research => "📝 Research Report:",
            BasicSection::Analysis => "📈 Detailed Analysis:",
            BasicSection::Recommendation => "💡 Investment Recommendation:",
        }
    }

    /// Section produced by the chain step of the same name, with its output key
    fn for_step(step: &str) -> Option<(BasicSection, &'static str)> {
        match step {
            "basic.research" => Some((BasicSection::Research, RESEARCH_REPORT)),
            "basic.analysis" => Some((BasicSection::Analysis, ANALYSIS_REPORT)),
            "basic.recommendation" => Some((BasicSection::Recommendation, RECOMMENDATION)),
            _ => None,
        }
    }
}

/// Receives progress of a research run
pub trait ProgressReporter: Send + Sync {
    /// A run for `ticker` is starting
    fn analysis_started(&self, _ticker: &Ticker, _mode: AnalysisMode) {}

    /// A professional stage is starting
    fn stage(&self, _stage: Stage) {}

    /// A basic-flow section is complete
    fn section(&self, _section: BasicSection, _text: &str) {}
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}

/// Forwards chain step notifications to a [`ProgressReporter`]
pub(crate) struct StageObserver<'a> {
    reporter: &'a dyn ProgressReporter,
}

impl<'a> StageObserver<'a> {
    pub(crate) fn new(reporter: &'a dyn ProgressReporter) -> Self {
        Self { reporter }
    }
}

impl ChainObserver for StageObserver<'_> {
    fn step_started(&self, name: &str) {
        if let Some(stage) = Stage::for_step(name) {
            self.reporter.stage(stage);
        }
    }

    fn step_finished(&self, name: &str, elapsed: Duration, values: &ChainValues) {
        debug!(step = name, elapsed_ms = elapsed.as_millis() as u64, "Step done");
        if let Some((section, key)) = BasicSection::for_step(name) {
            if let Some(text) = values.get_str(key) {
                self.reporter.section(section, text);
            }
        }
    }
}
