//! Research pipeline
//!
//! [`ResearchDesk`] collects market data, computes the deterministic inputs
//! and drives the LLM chains that write the report sections.

pub mod desk;
pub mod progress;
pub mod report;

pub use desk::ResearchDesk;
pub use progress::{AnalysisMode, BasicSection, ProgressReporter, SilentProgress, Stage};
pub use report::{BasicReport, ResearchReport};
