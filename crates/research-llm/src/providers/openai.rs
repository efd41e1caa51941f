//! OpenAI-compatible chat completion provider
//!
//! Groq, OpenAI and most self-hosted inference servers expose the same
//! `/chat/completions` endpoint. The research desk talks to Groq by default.
//!
//! # Example
//!
//! ```no_run
//! use research_llm::{CompletionRequest, LLMProvider, Message};
//! use research_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GROQ_API_KEY (and optionally GROQ_API_BASE)
//!     let provider = OpenAIProvider::with_config(OpenAIConfig::from_env()?)?;
//!
//!     let request = CompletionRequest::builder("llama3-70b-8192")
//!         .add_message(Message::user("Summarize Tesla's business model."))
//!         .temperature(0.3)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use research_utils::{env_or, env_var};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default endpoint for Groq's OpenAI-compatible API
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default endpoint for OpenAI
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL of the API (without the `/chat/completions` suffix)
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    /// Create a config pointed at OpenAI with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a config pointed at Groq with the given API key
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(api_key).with_api_base(GROQ_API_BASE)
    }

    /// Create a Groq config from the environment
    ///
    /// Reads the API key from `GROQ_API_KEY`. An unset or blank key is a
    /// configuration error. A non-blank `GROQ_API_BASE` overrides the endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key = env_var("GROQ_API_KEY")
            .map_err(|e| LLMError::ConfigurationError(e.to_string()))?;
        let api_base = env_or("GROQ_API_BASE", GROQ_API_BASE);

        Ok(Self::new(api_key).with_api_base(api_base))
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Provider for any OpenAI-compatible chat completion API
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
    name: String,
}

impl OpenAIProvider {
    /// Create a provider from a configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let name = if config.api_base.contains("groq.com") {
            "groq"
        } else {
            "openai"
        }
        .to_string();

        Ok(Self {
            client,
            config,
            name,
        })
    }

    /// Create a Groq provider with the given API key
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::groq(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(provider = %self.name, model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending chat completion to {}", self.config.api_base);

        let wire_request = ChatRequest {
            model: request.model.clone(),
            messages: build_chat_messages(request.system, request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop_sequences,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&wire_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(map_status_error(status.as_u16(), error_text, request.model));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_chat_response(chat_response)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// System prompt first, then the conversation in order
fn build_chat_messages(system: Option<String>, messages: Vec<Message>) -> Vec<ChatMessage> {
    system
        .map(Message::system)
        .into_iter()
        .chain(messages)
        .map(|msg| ChatMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content),
        })
        .collect()
}

fn map_status_error(status: u16, body: String, model: String) -> LLMError {
    match status {
        401 => LLMError::AuthenticationFailed,
        429 => LLMError::RateLimitExceeded(body),
        400 => LLMError::InvalidRequest(body),
        404 => LLMError::ModelNotFound(model),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

fn parse_chat_response(response: ChatResponse) -> Result<CompletionResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let usage = response
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let finish_reason = choice.finish_reason.unwrap_or_default();
    debug!(
        "Received response - finish_reason: {}, tokens: {}/{}",
        finish_reason, usage.input_tokens, usage.output_tokens
    );

    Ok(CompletionResponse {
        message: Message {
            role: Role::Assistant,
            content: choice.message.content.unwrap_or_default(),
        },
        stop_reason: map_stop_reason(&finish_reason),
        usage,
    })
}

fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::EndTurn,
        "length" => StopReason::MaxTokens,
        _ => {
            debug!("Unmapped finish reason: {}", reason);
            StopReason::EndTurn
        }
    }
}
