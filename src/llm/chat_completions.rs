//! OpenAI-compatible Chat Completions client.
//!
//! Sends one non-streaming request to the configured endpoint and extracts
//! `choices[0].message.content`.

use super::{ChatCompletionRequest, ChatCompletionResponse, CompletionClient, CompletionError};
use crate::config::CommentatorConfig;

/// Client for a Chat Completions endpoint.
///
/// The endpoint URL is used as configured; no path is appended.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Create a client for the endpoint and key in `config`.
    #[must_use]
    pub fn new(config: &CommentatorConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: reqwest::Client, config: &CommentatorConfig) -> Self {
        Self {
            http,
            endpoint: config.base_url.clone(),
            api_key: config.api_key().map(ToString::to_string),
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, req: &ChatCompletionRequest) -> Result<String, CompletionError> {
        let mut rb = self.http.post(&self.endpoint).json(req);
        if let Some(k) = &self.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status));
        }

        let body = resp.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

        parsed
            .first_content()
            .map(ToString::to_string)
            .ok_or(CompletionError::MissingContent)
    }
}
