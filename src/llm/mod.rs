//! Completion-service client.
//!
//! A trait-based abstraction over the external completion service, with an
//! OpenAI-compatible HTTP implementation. The pipeline only depends on the
//! trait, so tests drive it with scripted fakes.

mod error;
mod openai;

pub use error::{classify_http_status, LlmError, LlmErrorKind, RetryConfig};
pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role in a chat conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Optional sampling parameters for a completion request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub temperature: Option<f64>,
}

/// Trait for completion-service clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request and return the response text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> anyhow::Result<String>;
}

/// Convenience helpers shared by the generator and analyzer.
#[async_trait]
pub trait LlmClientExt: LlmClient {
    /// Single-shot text completion with a system prompt.
    async fn text(&self, system_prompt: &str, prompt: &str) -> anyhow::Result<String> {
        let messages = [ChatMessage::system(system_prompt), ChatMessage::user(prompt)];
        self.complete(&messages, ChatOptions::default()).await
    }

    /// Single-shot completion expected to contain a JSON object; the object
    /// is extracted from the surrounding text and parsed.
    async fn json(&self, system_prompt: &str, prompt: &str) -> anyhow::Result<serde_json::Value> {
        let text = self.text(system_prompt, prompt).await?;
        extract_json(&text)
    }
}

impl<T: LlmClient + ?Sized> LlmClientExt for T {}

/// Extract the first JSON object embedded in model output.
///
/// Models frequently wrap JSON in prose or code fences; this scans for the
/// outermost brace pair and parses that slice.
pub fn extract_json(text: &str) -> anyhow::Result<serde_json::Value> {
    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Ok(value);
    }

    let start = text
        .find('{')
        .ok_or_else(|| anyhow::anyhow!("no JSON object in model response"))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| anyhow::anyhow!("no JSON object in model response"))?;
    if end < start {
        anyhow::bail!("no JSON object in model response");
    }

    serde_json::from_str(&text[start..=end])
        .map_err(|e| anyhow::anyhow!("failed to parse JSON from model response: {}", e))
}
