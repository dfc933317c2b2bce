//! OpenAI-compatible LLM provider.
//!
//! One implementation for every backend exposing the `/chat/completions`
//! endpoint:
//!
//! - OpenAI (`https://api.openai.com/v1`)
//! - Groq (`https://api.groq.com/openai/v1`)
//! - any self-hosted server given an explicit `apiBase`
//!
//! A failed call is reported once; there is no retry loop. The caller turns
//! errors into a canned reply.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ChatMessage, LlmResponse, Usage};
use super::LlmProvider;

/// Known provider base URLs.
const PROVIDER_URLS: &[(&str, &str)] = &[
    ("openai", "https://api.openai.com/v1"),
    ("groq", "https://api.groq.com/openai/v1"),
];

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    client: Client,
    name: String,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl OpenAiProvider {
    /// Create a new provider.
    ///
    /// # Arguments
    /// * `provider_name` - Provider identifier ("openai", "groq", ...)
    /// * `api_key` - API key for authentication
    /// * `api_base` - Custom base URL (overrides the default for the provider)
    /// * `default_model` - Default model to use
    pub fn new(
        provider_name: &str,
        api_key: &str,
        api_base: Option<&str>,
        default_model: &str,
        client: Client,
    ) -> Self {
        let base_url = api_base
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                PROVIDER_URLS
                    .iter()
                    .find(|(name, _)| *name == provider_name)
                    .map(|(_, url)| url.to_string())
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            })
            .trim_end_matches('/')
            .to_string();

        debug!(provider = provider_name, base_url = %base_url, "Initialized LLM provider");

        Self {
            client,
            name: provider_name.to_string(),
            api_key: api_key.to_string(),
            base_url,
            default_model: default_model.to_string(),
        }
    }
}

// ── OpenAI API request/response types ───────────────────────────────

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageResponse>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageResponse,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageResponse {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorResponse {
    Single(ErrorBody),
    Multiple(Vec<ErrorBody>),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ErrorResponse {
    fn message(&self) -> String {
        match self {
            Self::Single(b) => b.error.message.clone(),
            Self::Multiple(v) => v
                .first()
                .map(|b| b.error.message.clone())
                .unwrap_or_else(|| "Unknown error".into()),
        }
    }
}

// ── LlmProvider implementation ──────────────────────────────────────

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<LlmResponse> {
        let model = model.unwrap_or(&self.default_model);
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = CompletionRequest {
            model,
            messages,
            max_tokens,
            temperature,
        };

        debug!(provider = %self.name, model, url = %url, msg_count = messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {} API", self.name))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read LLM API response body")?;

        if !status.is_success() {
            let err_msg = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message())
                .unwrap_or_else(|_| body.clone());
            anyhow::bail!("LLM API error ({}): {}", status, err_msg);
        }

        let completion: CompletionResponse =
            serde_json::from_str(&body).context("Failed to parse LLM API response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("LLM API returned no choices")?;

        let usage = completion.usage.map_or(Usage::default(), |u| Usage {
            prompt_tokens: u.prompt_tokens.unwrap_or(0),
            completion_tokens: u.completion_tokens.unwrap_or(0),
            total_tokens: u.total_tokens.unwrap_or(0),
        });

        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            tokens = usage.total_tokens,
            "Received LLM response"
        );

        Ok(LlmResponse {
            content: choice.message.content,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".into()),
            usage,
        })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn name(&self) -> &str {
        &self.name
    }
}
