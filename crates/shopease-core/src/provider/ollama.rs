//! Local Ollama provider (`POST {base}/api/chat`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ChatMessage, LlmResponse, Usage};
use super::LlmProvider;

/// Reply used when Ollama answers without any message content.
pub const EMPTY_REPLY: &str = "I could not generate a response right now.";

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    default_model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, default_model: &str, client: Client) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, model = default_model, "Initialized Ollama provider");
        Self {
            client,
            base_url,
            default_model: default_model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    messages: Option<Vec<OllamaMessage>>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// `message.content`, else the last entry of `messages`, else the canned
    /// empty reply.
    fn into_text(self) -> String {
        if let Some(content) = self
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
        {
            return content;
        }
        if let Some(messages) = self.messages {
            return messages
                .into_iter()
                .last()
                .and_then(|m| m.content)
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| EMPTY_REPLY.to_string());
        }
        EMPTY_REPLY.to_string()
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<LlmResponse> {
        let model = model.unwrap_or(&self.default_model);
        let url = format!("{}/api/chat", self.base_url);

        debug!(model, url = %url, msg_count = messages.len(), "Sending Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                model,
                messages,
                stream: false,
            })
            .send()
            .await
            .context("Failed to reach Ollama")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Ollama response body")?;

        if !status.is_success() {
            anyhow::bail!("Ollama error ({}): {}", status, body);
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).context("Failed to parse Ollama response")?;

        let prompt_tokens = parsed.prompt_eval_count.unwrap_or(0);
        let completion_tokens = parsed.eval_count.unwrap_or(0);
        let finish_reason = parsed.done_reason.clone().unwrap_or_else(|| "stop".into());

        Ok(LlmResponse {
            content: Some(parsed.into_text()),
            finish_reason,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens.saturating_add(completion_tokens),
            },
        })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
