//! Chat-completion client.
//!
//! This module provides the typed request/response shapes of the `OpenAI`
//! compatible Chat Completions API and the [`CompletionClient`] seam the
//! commentator talks to.
//!
//! # Clients
//!
//! - [`ChatCompletionsClient`]: non-streaming `POST` to a configured endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use followup_widgets::config::CommentatorConfig;
//! use followup_widgets::llm::ChatCompletionsClient;
//!
//! let client = ChatCompletionsClient::new(&CommentatorConfig::default());
//! ```

pub mod chat_completions;

pub use chat_completions::ChatCompletionsClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a chat-completion message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Body of a non-streaming completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The subset of a completion response we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if present and non-empty.
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Failure modes of a completion call.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response has no first-choice content")]
    MissingContent,
}

/// Something that can answer a single chat-completion request.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `req` and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-2xx statuses, bodies that
    /// are not JSON, and responses without first-choice content.
    async fn complete(&self, req: &ChatCompletionRequest) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_wire_shape() {
        let req = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            temperature: 0.5,
            max_tokens: 150,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "m");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "u");
        assert_eq!(v["temperature"], 0.5);
        assert_eq!(v["max_tokens"], 150);
    }

    #[test]
    fn test_first_content() {
        let ok: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"哦？"}}]}"#)
                .unwrap();
        assert_eq!(ok.first_content(), Some("哦？"));

        let empty: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert_eq!(empty.first_content(), None);

        let none: ChatCompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(none.first_content(), None);
    }
}
