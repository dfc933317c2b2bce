//! Intent Router — keyword-based, zero-cost classification.
//!
//! Classifies a shopper's message into an [`Intent`] by walking an ordered
//! rule table. The first rule that matches wins, so the order of [`RULES`]
//! is the tie-break: a message mentioning both a refund and a product is a
//! return, not a recommendation.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::orders::ORDER_ID;

/// Coarse category that decides which handler answers a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Order,
    Return,
    Recommendation,
    Faq,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Return => "return",
            Self::Recommendation => "recommendation",
            Self::Faq => "faq",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table.
struct IntentRule {
    intent: Intent,
    /// Also fire when the text carries an order id.
    order_id: bool,
    keywords: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, raw: &str, lower: &str) -> bool {
        (self.order_id && ORDER_ID.is_match(raw)) || self.keywords.iter().any(|kw| lower.contains(kw))
    }
}

/// Evaluated top to bottom.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Order,
        order_id: true,
        keywords: &["order status", "where is my order", "track"],
    },
    IntentRule {
        intent: Intent::Return,
        order_id: false,
        keywords: &["return", "refund", "exchange"],
    },
    IntentRule {
        intent: Intent::Recommendation,
        order_id: false,
        keywords: &["recommend", "suggest", "best", "product"],
    },
    IntentRule {
        intent: Intent::Faq,
        order_id: false,
        keywords: &["faq", "delivery", "shipping", "payment", "cash on delivery"],
    },
];

pub struct IntentRouter;

impl IntentRouter {
    /// Classify a message. Falls back to [`Intent::General`].
    pub fn classify(message: &str) -> Intent {
        let lower = message.to_lowercase();

        let intent = RULES
            .iter()
            .find(|rule| rule.matches(message, &lower))
            .map_or(Intent::General, |rule| rule.intent);

        debug!(intent = %intent, "Intent Router classified message");
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        assert_eq!(IntentRouter::classify("Where is my order ORD123"), Intent::Order);
        assert_eq!(IntentRouter::classify("status of ord42 please"), Intent::Order);
        assert_eq!(IntentRouter::classify("Can you TRACK my parcel?"), Intent::Order);
    }

    #[test]
    fn test_return() {
        assert_eq!(IntentRouter::classify("I want a refund"), Intent::Return);
        assert_eq!(IntentRouter::classify("Can I exchange this?"), Intent::Return);
    }

    #[test]
    fn test_recommendation() {
        assert_eq!(IntentRouter::classify("recommend a gift"), Intent::Recommendation);
        assert_eq!(IntentRouter::classify("What is your best laptop?"), Intent::Recommendation);
    }

    #[test]
    fn test_faq() {
        assert_eq!(IntentRouter::classify("what's your delivery policy"), Intent::Faq);
        assert_eq!(IntentRouter::classify("Do you take Cash on Delivery?"), Intent::Faq);
    }

    #[test]
    fn test_general() {
        assert_eq!(IntentRouter::classify("hello"), Intent::General);
        // Arabic-Indic digits do not form an order id
        assert_eq!(IntentRouter::classify("hi ORD\u{661}\u{662}\u{663}"), Intent::General);
    }

    #[test]
    fn test_priority_order() {
        // order beats return
        assert_eq!(IntentRouter::classify("return ORD77"), Intent::Order);
        // return beats recommendation
        assert_eq!(IntentRouter::classify("refund this product"), Intent::Return);
        // recommendation beats faq
        assert_eq!(IntentRouter::classify("best shipping option for a product"), Intent::Recommendation);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Recommendation).unwrap(), "\"recommendation\"");
        assert_eq!(Intent::Faq.to_string(), "faq");
    }
}
