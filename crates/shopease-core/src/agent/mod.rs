//! Support agent: the message-routing pipeline.
//!
//! For each shopper message the agent:
//! 1. Rejects blank input
//! 2. Classifies the intent
//! 3. Loads orders, products and FAQs (concurrently, fresh every time)
//! 4. Tries the rule-based handler for that intent
//! 5. Falls through to the FAQ matcher, then the shipping notice
//! 6. Hands anything still unanswered to the LLM responder

pub mod faq;
pub mod orders;
pub mod recommend;
pub mod router;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SupportConfig;
use crate::provider::Responder;
use crate::store::{Collections, DataStore};
pub use router::{Intent, IntentRouter};

/// Asked for when a message is about an order but names no id.
pub const ASK_FOR_ORDER_ID: &str =
    "I can help track your order. Please share your order ID (e.g., ORD12345).";

/// Reply body for blank input.
pub const EMPTY_MESSAGE_REPLY: &str = "Please provide a message.";

/// Reply body for anything unexpected.
pub const APOLOGY_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

/// The answer to one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub reply: String,
    pub intent: Intent,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
}

pub struct SupportAgent {
    store: DataStore,
    responder: Responder,
    support: SupportConfig,
}

impl SupportAgent {
    pub fn new(store: DataStore, responder: Responder, support: SupportConfig) -> Self {
        Self {
            store,
            responder,
            support,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Answer a raw message, loading fresh data for it.
    pub async fn respond(&self, message: &str) -> Result<Reply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let collections = self.store.load_all().await;
        self.respond_with(message, &collections).await
    }

    /// Answer a raw message against collections the caller already holds.
    pub async fn respond_with(
        &self,
        message: &str,
        collections: &Collections,
    ) -> Result<Reply, ChatError> {
        let text = message.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let intent = IntentRouter::classify(text);

        let mut reply = match intent {
            Intent::Order => Some(
                orders::check_order_status(text, &collections.orders)
                    .unwrap_or_else(|| ASK_FOR_ORDER_ID.to_string()),
            ),
            Intent::Return => Some(self.support.return_policy.clone()),
            Intent::Recommendation => recommend::recommend(text, &collections.products),
            Intent::Faq | Intent::General => None,
        };

        // The FAQ check runs for every intent that has not answered yet.
        if reply.is_none() {
            reply = faq::match_faq(text, &collections.faqs);
        }

        if reply.is_none() {
            let lower = text.to_lowercase();
            if lower.contains("shipping") || lower.contains("delivery") {
                reply = Some(self.support.shipping_info.clone());
            }
        }

        let reply = match reply {
            Some(r) => r,
            None => {
                debug!(intent = %intent, "No rule matched, asking the responder");
                self.responder.generate(text, collections).await
            }
        };

        info!(intent = %intent, reply_len = reply.len(), "Answered chat message");
        Ok(Reply { reply, intent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RETURN_POLICY, SHIPPING_INFO};
    use crate::provider::responder::fallback_reply;
    use crate::store::{FaqEntry, Order, Product};

    fn agent() -> SupportAgent {
        SupportAgent::new(
            DataStore::new("/nonexistent/shopease-data"),
            Responder::offline(),
            SupportConfig::default(),
        )
    }

    fn collections() -> Collections {
        Collections {
            orders: vec![Order {
                order_id: "ORD12345".into(),
                status: "Out for delivery".into(),
                expected_delivery: "2024-06-02".into(),
                items: vec!["Smart Watch".into()],
            }],
            products: vec![
                Product {
                    name: "Wireless Earbuds".into(),
                    category: "Electronics".into(),
                    price: 2999.0,
                    tags: vec!["wireless".into(), "audio".into()],
                    description: None,
                    image: None,
                },
                Product {
                    name: "Phone Stand".into(),
                    category: "Accessories".into(),
                    price: 499.0,
                    tags: vec!["mobile".into()],
                    description: None,
                    image: None,
                },
            ],
            faqs: vec![FaqEntry {
                question: "What payment methods do you accept?".into(),
                answer: "Cards, UPI and cash on delivery.".into(),
                keywords: vec!["payment".into(), "upi".into()],
            }],
        }
    }

    #[tokio::test]
    async fn test_blank_is_rejected() {
        let agent = agent();
        assert!(matches!(agent.respond("   \n").await, Err(ChatError::EmptyMessage)));
        assert!(matches!(
            agent.respond_with("", &collections()).await,
            Err(ChatError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_order_lookup() {
        let r = agent().respond_with("  where is ord12345? ", &collections()).await.unwrap();
        assert_eq!(r.intent, Intent::Order);
        assert!(r.reply.starts_with("Order ORD12345:\nStatus: Out for delivery"));

        let r = agent().respond_with("track ORD9", &collections()).await.unwrap();
        assert!(r.reply.contains("couldn't find order ORD9"));
    }

    #[tokio::test]
    async fn test_order_without_id_asks_for_it() {
        let r = agent().respond_with("where is my order", &collections()).await.unwrap();
        assert_eq!(r, Reply { reply: ASK_FOR_ORDER_ID.into(), intent: Intent::Order });
    }

    #[tokio::test]
    async fn test_return_policy_verbatim() {
        let r = agent().respond_with("I want a refund", &collections()).await.unwrap();
        assert_eq!(r.intent, Intent::Return);
        assert_eq!(r.reply, RETURN_POLICY);
    }

    #[tokio::test]
    async fn test_recommendation() {
        let r = agent().respond_with("recommend wireless gear", &collections()).await.unwrap();
        assert_eq!(r.intent, Intent::Recommendation);
        assert!(r.reply.contains("1. Wireless Earbuds"));
        assert!(!r.reply.contains("Phone Stand"));
    }

    #[tokio::test]
    async fn test_empty_catalog_recommendation_falls_through_to_faq() {
        let mut data = collections();
        data.products.clear();
        let r = agent().respond_with("suggest a product, payment by upi ok?", &data).await.unwrap();
        assert_eq!(r.intent, Intent::Recommendation);
        assert!(r.reply.starts_with("What payment methods do you accept?"));
    }

    #[tokio::test]
    async fn test_faq_runs_for_general_intent() {
        let r = agent().respond_with("hi, do you take upi", &collections()).await.unwrap();
        assert_eq!(r.intent, Intent::General);
        assert!(r.reply.ends_with("Cards, UPI and cash on delivery."));
    }

    #[tokio::test]
    async fn test_shipping_notice_when_no_faq() {
        let r = agent().respond_with("how long is shipping", &Collections::default()).await.unwrap();
        assert_eq!(r.intent, Intent::Faq);
        assert_eq!(r.reply, SHIPPING_INFO);
    }

    #[tokio::test]
    async fn test_falls_back_to_responder() {
        let r = agent().respond_with("  hello there ", &collections()).await.unwrap();
        assert_eq!(r.intent, Intent::General);
        assert_eq!(r.reply, fallback_reply("hello there"));
    }

    #[tokio::test]
    async fn test_unreadable_store_still_answers() {
        let r = agent().respond("recommend a gift").await.unwrap();
        assert_eq!(r.intent, Intent::Recommendation);
        assert_eq!(r.reply, fallback_reply("recommend a gift"));
    }

    #[test]
    fn test_reply_serializes_intent_lowercase() {
        let json = serde_json::to_value(Reply { reply: "x".into(), intent: Intent::Faq }).unwrap();
        assert_eq!(json, serde_json::json!({"reply": "x", "intent": "faq"}));
    }
}
