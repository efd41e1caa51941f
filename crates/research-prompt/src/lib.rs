//! Prompt templates for stock-research
//!
//! Every LLM step of the research pipeline is driven by a named
//! [`PromptTemplate`] that declares which variables it needs. Templates use
//! MiniJinja syntax and are kept in a [`PromptRegistry`].
//!
//! # Quick Start
//!
//! ```
//! use research_prompt::{PromptBuilder, PromptRegistry, PromptTemplate};
//! use serde_json::json;
//!
//! let text = PromptBuilder::new()
//!     .line("Analyze the following stock ticker: {{ ticker }}")
//!     .blank_line()
//!     .line("Provide a comprehensive overview including:")
//!     .numbered(["Company description", "Key financial metrics"])
//!     .build();
//!
//! let registry = PromptRegistry::new();
//! registry.register(PromptTemplate::new("overview", ["ticker"], text).unwrap());
//!
//! let prompt = registry.render("overview", &json!({ "ticker": "TSLA" })).unwrap();
//! assert!(prompt.contains("ticker: TSLA"));
//! assert!(prompt.contains("2. Key financial metrics"));
//! ```

mod builder;
mod error;
mod registry;
mod template;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
