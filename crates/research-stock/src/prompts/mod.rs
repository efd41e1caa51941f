//! Research prompt templates
//!
//! Templates are organized into:
//! - `institutional`: fundamental, technical and recommendation prompts
//! - `basic`: the lighter research, analysis and recommendation prompts

pub mod basic;
pub mod institutional;

use research_prompt::{PromptRegistry, Result};

/// Registry names of the research prompts
pub mod names {
    pub const FUNDAMENTAL: &str = "research.fundamental";
    pub const TECHNICAL: &str = "research.technical";
    pub const RECOMMENDATION: &str = "research.recommendation";

    pub const BASIC_RESEARCH: &str = "research.basic.research";
    pub const BASIC_ANALYSIS: &str = "research.basic.analysis";
    pub const BASIC_RECOMMENDATION: &str = "research.basic.recommendation";
}

/// Register every research prompt with the given registry
pub fn register_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(institutional::fundamental_prompt()?);
    registry.register(institutional::technical_prompt()?);
    registry.register(institutional::recommendation_prompt()?);

    registry.register(basic::research_prompt()?);
    registry.register(basic::analysis_prompt()?);
    registry.register(basic::recommendation_prompt()?);

    Ok(())
}
