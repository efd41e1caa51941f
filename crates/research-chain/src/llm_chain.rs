//! Single prompt → single completion chain

use async_trait::async_trait;
use research_core::{Chain, ChainValues, Error, Result};
use research_llm::{CompletionRequest, LLMProvider, Message};
use research_prompt::PromptTemplate;
use std::sync::Arc;
use tracing::debug;

/// Model parameters shared by the chains of a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,
    /// Maximum tokens per completion
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmSettings {
    /// Create settings for a model
    pub fn new(model: impl Into<String>, max_tokens: usize, temperature: f32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature,
        }
    }
}

/// A chain that renders a prompt and stores the model's answer
///
/// The rendered prompt is sent as a single user message. The trimmed reply
/// is written to `output_key`.
pub struct LlmChain {
    name: String,
    prompt: Arc<PromptTemplate>,
    provider: Arc<dyn LLMProvider>,
    settings: LlmSettings,
    output_key: String,
}

impl LlmChain {
    /// Create a new LLM chain
    pub fn new(
        name: impl Into<String>,
        prompt: Arc<PromptTemplate>,
        provider: Arc<dyn LLMProvider>,
        settings: LlmSettings,
        output_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prompt,
            provider,
            settings,
            output_key: output_key.into(),
        }
    }

    /// Name of the variable this chain writes
    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// Model settings used for every call
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}

#[async_trait]
impl Chain for LlmChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_keys(&self) -> Vec<String> {
        self.prompt.input_variables().to_vec()
    }

    fn output_keys(&self) -> Vec<String> {
        vec![self.output_key.clone()]
    }

    async fn call(&self, values: &mut ChainValues) -> Result<()> {
        let prompt = self.prompt.render(&values.to_json())?;
        debug!(chain = %self.name, prompt_len = prompt.len(), "Rendered prompt");

        let request = CompletionRequest::builder(&self.settings.model)
            .add_message(Message::user(prompt))
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        debug!(
            chain = %self.name,
            provider = self.provider.name(),
            tokens = response.usage.total(),
            "Completion received"
        );

        let text = response.text().trim();
        if text.is_empty() {
            return Err(Error::ProcessingFailed(format!(
                "{} returned an empty completion",
                self.name
            )));
        }

        values.insert(self.output_key.clone(), serde_json::Value::String(text.to_string()));
        Ok(())
    }
}
