//! Chat completion layer for stock-research
//!
//! This crate provides provider-agnostic types for talking to a chat
//! completion model:
//!
//! - Message types for the conversation
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider (Groq preset) in [`providers`]

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
