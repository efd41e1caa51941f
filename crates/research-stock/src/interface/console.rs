//! Progress printed to the terminal

use super::formatter::CliFormatter;
use crate::engine::{AnalysisMode, BasicSection, ProgressReporter, Stage};
use crate::ticker::Ticker;

/// Prints captions and basic-flow sections to stdout as the pipeline advances
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn analysis_started(&self, ticker: &Ticker, mode: AnalysisMode) {
        println!("{}", CliFormatter::format_start(ticker, mode));
    }

    fn stage(&self, stage: Stage) {
        println!("{}", CliFormatter::format_stage(stage));
    }

    fn section(&self, section: BasicSection, text: &str) {
        println!("{}", CliFormatter::format_section(section, text));
    }
}
