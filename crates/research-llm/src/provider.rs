//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for chat completion providers
///
/// The research pipeline only needs one call: send a conversation, get the
/// assistant's reply back. Anything that speaks that protocol (Groq, OpenAI,
/// a local OpenAI-compatible server, a scripted test double) can implement it.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "groq", "openai")
    fn name(&self) -> &str;
}
