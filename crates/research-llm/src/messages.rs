//! Message types for chat completion
//!
//! Research prompts are plain text, so a message is a role plus a string.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant message
    Assistant,
    /// System message
    System,
}

impl Role {
    /// Wire name used by OpenAI-compatible APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Message text
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }

    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Message text
    pub fn text(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Analyze TSLA");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), "Analyze TSLA");
    }

    #[test]
    fn test_assistant_message() {
        let msg = Message::assistant("Tesla designs electric vehicles");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.text(), "Tesla designs electric vehicles");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Message::system("Be concise")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"Be concise"}"#);
    }
}
