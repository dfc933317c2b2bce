//! LLM provider trait and the backends behind it.
//!
//! Defines the `LlmProvider` trait that all backends must implement.
//! The `openai` module covers OpenAI and Groq (both speak the OpenAI chat
//! completions API); `ollama` talks to a local Ollama server. The
//! `responder` module wraps whichever one is configured and never fails.

pub mod ollama;
pub mod openai;
pub mod responder;
pub mod types;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ProviderChoice;
use ollama::OllamaProvider;
use openai::OpenAiProvider;
use types::{ChatMessage, LlmResponse};

pub use responder::Responder;

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` - System prompt followed by the user turn
    /// * `model` - Model identifier override (None = use default)
    /// * `max_tokens` - Maximum response tokens
    /// * `temperature` - Sampling temperature
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> anyhow::Result<LlmResponse>;

    /// Get the default model identifier.
    fn default_model(&self) -> &str;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}

/// Instantiate the backend for a resolved provider choice.
///
/// Returns `None` for [`ProviderChoice::Offline`].
pub fn build_provider(choice: &ProviderChoice, client: Client) -> Option<Box<dyn LlmProvider>> {
    match choice {
        ProviderChoice::OpenAi {
            api_key,
            api_base,
            model,
        } => Some(Box::new(OpenAiProvider::new(
            "openai",
            api_key,
            api_base.as_deref(),
            model,
            client,
        ))),
        ProviderChoice::Groq {
            api_key,
            api_base,
            model,
        } => Some(Box::new(OpenAiProvider::new(
            "groq",
            api_key,
            api_base.as_deref(),
            model,
            client,
        ))),
        ProviderChoice::Ollama { base_url, model } => {
            Some(Box::new(OllamaProvider::new(base_url, model, client)))
        }
        ProviderChoice::Offline => None,
    }
}
