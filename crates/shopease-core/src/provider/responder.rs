//! The fallback responder: LLM-backed when a provider is configured, canned
//! text otherwise. `generate` never fails.

use reqwest::Client;
use tracing::{debug, info, warn};

use super::types::ChatMessage;
use super::{build_provider, LlmProvider};
use crate::config::{Config, LlmConfig, ProviderChoice};
use crate::store::Collections;

const SYSTEM_PROMPT: &str = "You are the AI Customer Support Assistant for ShopEase, an e-commerce platform.
Provide concise, friendly, and factual answers.
You can help with:
- Order status lookup
- Return and refund policies
- Product recommendations
- Shipping and delivery questions
- FAQs about payments, delivery, and support hours

Always guide the user to share an order ID (e.g., ORD12345) for tracking.";

pub struct Responder {
    provider: Option<Box<dyn LlmProvider>>,
    llm: LlmConfig,
}

impl Responder {
    pub fn new(provider: Option<Box<dyn LlmProvider>>, llm: LlmConfig) -> Self {
        Self { provider, llm }
    }

    /// Build the responder for a provider chosen at startup.
    pub fn from_choice(choice: &ProviderChoice, llm: LlmConfig, client: Client) -> Self {
        let responder = Self::new(build_provider(choice, client), llm);
        info!(
            provider = responder.provider_name(),
            model = responder.model().unwrap_or("-"),
            "Fallback responder ready"
        );
        responder
    }

    /// Resolve the provider from config and share one HTTP client for it.
    pub fn from_config(config: &Config) -> Self {
        Self::from_choice(&config.providers.select(), config.llm.clone(), Client::new())
    }

    /// A responder that never calls out.
    pub fn offline() -> Self {
        Self::new(None, LlmConfig::default())
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_ref().map_or("offline", |p| p.name())
    }

    /// Model every request is sent to, if a provider is configured.
    pub fn model(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.default_model())
    }

    /// Answer `message` using the loaded collections as context.
    pub async fn generate(&self, message: &str, context: &Collections) -> String {
        let Some(provider) = &self.provider else {
            return fallback_reply(message);
        };

        let messages = build_messages(message, context);
        match provider
            .chat(&messages, None, self.llm.max_tokens, self.llm.temperature)
            .await
        {
            Ok(res) => {
                debug!(
                    provider = provider.name(),
                    finish_reason = %res.finish_reason,
                    tokens = res.usage.total_tokens,
                    "LLM replied"
                );
                match res.content {
                    Some(text) => text,
                    None => {
                        warn!(provider = provider.name(), "LLM returned no content");
                        fallback_reply(message)
                    }
                }
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "LLM provider error");
                fallback_reply(message)
            }
        }
    }
}

/// The canned reply used offline and whenever the provider fails.
pub fn fallback_reply(message: &str) -> String {
    format!(
        "I understand you're asking about \"{message}\". I can help with order tracking \
         (share your order ID), returns, shipping times, or recommend products. \
         What would you like to know?"
    )
}

/// System prompt with a short summary of the data, then the user turn.
pub fn build_messages(message: &str, context: &Collections) -> Vec<ChatMessage> {
    let or_na = |s: String| if s.is_empty() { "N/A".to_string() } else { s };

    let order_ids = or_na(
        context
            .orders
            .iter()
            .map(|o| o.order_id.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    let product_names = or_na(
        context
            .products
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );

    let system = format!(
        "{SYSTEM_PROMPT}\nContext:\nOrders: {order_ids}\nProducts: {product_names}\nFAQs: {} entries.",
        context.faqs.len()
    );

    vec![ChatMessage::system(&system), ChatMessage::user(message)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::{LlmResponse, Usage};
    use crate::store::{Order, Product};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedProvider {
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            _model: Option<&str>,
            max_tokens: u32,
            _temperature: f32,
        ) -> anyhow::Result<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(messages.len(), 2);
            assert_eq!(max_tokens, 500);
            match self.reply {
                Some(text) => Ok(LlmResponse {
                    content: Some(text.into()),
                    finish_reason: "stop".into(),
                    usage: Usage::default(),
                }),
                None => anyhow::bail!("LLM API error (503): overloaded"),
            }
        }

        fn default_model(&self) -> &str {
            "scripted"
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn responder(reply: Option<&'static str>) -> (Responder, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            reply,
            calls: calls.clone(),
        };
        (Responder::new(Some(Box::new(provider)), LlmConfig::default()), calls)
    }

    #[tokio::test]
    async fn test_offline_uses_canned_reply() {
        let r = Responder::offline();
        assert_eq!(r.provider_name(), "offline");
        assert_eq!(r.model(), None);
        let reply = r.generate("hello", &Collections::default()).await;
        assert!(reply.starts_with("I understand you're asking about \"hello\"."));
    }

    #[tokio::test]
    async fn test_provider_reply_passes_through() {
        let (r, calls) = responder(Some("Hi from the model"));
        assert_eq!(r.model(), Some("scripted"));
        assert_eq!(r.generate("hello", &Collections::default()).await, "Hi from the model");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_content_is_returned_as_is() {
        let (r, _) = responder(Some(""));
        assert_eq!(r.generate("hello", &Collections::default()).await, "");
    }

    #[tokio::test]
    async fn test_provider_error_degrades() {
        let (r, calls) = responder(None);
        let reply = r.generate("what's up", &Collections::default()).await;
        assert_eq!(reply, fallback_reply("what's up"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_context_summary() {
        let context = Collections {
            orders: vec![Order {
                order_id: "ORD1".into(),
                status: "Shipped".into(),
                expected_delivery: "today".into(),
                items: vec![],
            }],
            products: vec![Product {
                name: "Lamp".into(),
                category: "Home".into(),
                price: 10.0,
                tags: vec![],
                description: None,
                image: None,
            }],
            faqs: vec![],
        };
        let messages = build_messages("hi", &context);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0]
            .content
            .ends_with("Context:\nOrders: ORD1\nProducts: Lamp\nFAQs: 0 entries."));
        assert_eq!(messages[1], ChatMessage::user("hi"));

        let empty = build_messages("hi", &Collections::default());
        assert!(empty[0].content.contains("Orders: N/A\nProducts: N/A"));
    }
}
