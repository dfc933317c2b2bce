//! Keyword-overlap product recommendations.

use std::fmt::Write;

use crate::store::Product;

const CATEGORY_POINTS: u32 = 5;
const TAG_POINTS: u32 = 3;
const MAX_RESULTS: usize = 3;

/// Words longer than three characters, lower-cased.
fn keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .map(str::to_owned)
        .collect()
}

/// +5 once if any keyword hits the category, +3 for every keyword that hits
/// at least one tag.
fn score(product: &Product, keywords: &[String]) -> u32 {
    let category = product.category.to_lowercase();
    let tags: Vec<String> = product.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0;
    if keywords.iter().any(|kw| category.contains(kw.as_str())) {
        score += CATEGORY_POINTS;
    }
    for kw in keywords {
        if tags.iter().any(|tag| tag.contains(kw.as_str())) {
            score += TAG_POINTS;
        }
    }
    score
}

/// Top-scoring products, best first. Ties keep catalog order.
pub fn rank<'a>(text: &str, products: &'a [Product]) -> Vec<(&'a Product, u32)> {
    let keywords = keywords(text);
    let mut scored: Vec<(&Product, u32)> = products
        .iter()
        .map(|p| (p, score(p, &keywords)))
        .filter(|(_, s)| *s > 0)
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(MAX_RESULTS);
    scored
}

/// Build the recommendation reply.
///
/// Falls back to the first few catalog entries when nothing scores, and
/// returns `None` only for an empty catalog.
pub fn recommend(text: &str, products: &[Product]) -> Option<String> {
    let top = rank(text, products);

    if !top.is_empty() {
        let mut out = String::from("Here are some product recommendations:\n\n");
        for (i, (product, _)) in top.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, product.name);
            let _ = writeln!(out, "   Category: {}", product.category);
            let _ = writeln!(out, "   Price: Rs. {}", format_price(product.price));
            let _ = writeln!(out, "   Tags: {}\n", product.tags.join(", "));
        }
        return Some(out);
    }

    if products.is_empty() {
        return None;
    }

    let mut out = String::from("Here are our featured products:\n\n");
    for (i, product) in products.iter().take(MAX_RESULTS).enumerate() {
        let _ = writeln!(out, "{}. {} - Rs. {}", i + 1, product.name, format_price(product.price));
    }
    Some(out)
}

/// en-US style: comma-grouped integer part, at most three decimals with
/// trailing zeros dropped.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let sign = if price < 0.0 { "-" } else { "" };
    let abs = price.abs();
    let mut whole = abs.trunc();
    let mut frac = ((abs - whole) * 1000.0).round() as u32;
    if frac >= 1000 {
        whole += 1.0;
        frac = 0;
    }

    // `{:.0}` prints the full integer part, never exponent form.
    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac == 0 {
        format!("{sign}{grouped}")
    } else {
        let frac = format!("{frac:03}");
        format!("{sign}{grouped}.{}", frac.trim_end_matches('0'))
    }
}
