//! FAQ lookup.

use crate::store::FaqEntry;

/// First FAQ, in file order, whose keyword appears in the message or whose
/// full question is quoted by it. Not ranked.
pub fn match_faq(text: &str, faqs: &[FaqEntry]) -> Option<String> {
    let lower = text.to_lowercase();
    faqs.iter()
        .find(|faq| {
            faq.keywords
                .iter()
                .any(|kw| lower.contains(kw.to_lowercase().as_str()))
                || lower.contains(faq.question.to_lowercase().as_str())
        })
        .map(|faq| format!("{}\n{}", faq.question, faq.answer))
}
