//! Prompt chains for stock-research
//!
//! An [`LlmChain`] turns one prompt template into one LLM call. A
//! [`SequentialChain`] runs several chains in order over a shared
//! [`research_core::ChainValues`] store, so the output of one analysis can
//! feed the prompt of the next.

pub mod llm_chain;
pub mod sequential;

// Re-export for convenience
pub use llm_chain::{LlmChain, LlmSettings};
pub use sequential::{ChainObserver, SequentialChain, SequentialChainBuilder};
