//! Order lookup by id mentioned in free text.

use regex::Regex;
use std::sync::LazyLock;

use crate::store::Order;

/// `ORD` followed by ASCII digits, any case. `\d` would also accept
/// non-ASCII decimal digits.
pub(crate) static ORDER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ORD[0-9]+").expect("order id regex compilation failed"));

/// First order id in `text`, upper-cased.
pub fn extract_order_id(text: &str) -> Option<String> {
    ORDER_ID.find(text).map(|m| m.as_str().to_uppercase())
}

/// Case-insensitive lookup by id.
pub fn find_order<'a>(id: &str, orders: &'a [Order]) -> Option<&'a Order> {
    let wanted = id.to_uppercase();
    orders.iter().find(|o| o.order_id.to_uppercase() == wanted)
}

/// Render the status block for the order mentioned in `text`.
///
/// Returns `None` only when the text names no order id at all; an id that is
/// not on file still produces a reply.
pub fn check_order_status(text: &str, orders: &[Order]) -> Option<String> {
    let id = extract_order_id(text)?;

    let reply = match find_order(&id, orders) {
        Some(order) => format!(
            "Order {}:\nStatus: {}\nExpected Delivery: {}\nItems: {}",
            order.order_id,
            order.status,
            order.expected_delivery,
            order.items.join(", ")
        ),
        None => format!(
            "I couldn't find order {id}. Please confirm your order ID (e.g., ORD12345) \
             or double-check your email confirmation."
        ),
    };
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Vec<Order> {
        vec![Order {
            order_id: "ORD12345".into(),
            status: "Shipped".into(),
            expected_delivery: "2024-06-02".into(),
            items: vec!["Wireless Earbuds".into(), "Phone Case".into()],
        }]
    }

    #[test]
    fn test_extract_is_uppercased_first_match() {
        assert_eq!(extract_order_id("hey ord555 and ORD777").as_deref(), Some("ORD555"));
        assert_eq!(extract_order_id("xxORD1yy").as_deref(), Some("ORD1"));
        assert_eq!(extract_order_id("no id here"), None);
        assert_eq!(extract_order_id("ORD without digits"), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_an_id() {
        assert_eq!(extract_order_id("ORD\u{661}\u{662}\u{663}"), None);
        assert_eq!(extract_order_id("hi ORD\u{0967}\u{0968} or ORD12").as_deref(), Some("ORD12"));
        assert_eq!(check_order_status("hi ORD\u{661}\u{662}\u{663}", &orders()), None);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let orders = orders();
        assert!(find_order("ord12345", &orders).is_some());
        assert!(find_order("ORD999", &orders).is_none());
    }

    #[test]
    fn test_status_block() {
        let reply = check_order_status("where is ord12345?", &orders()).unwrap();
        assert_eq!(
            reply,
            "Order ORD12345:\nStatus: Shipped\nExpected Delivery: 2024-06-02\nItems: Wireless Earbuds, Phone Case"
        );
    }

    #[test]
    fn test_unknown_order_names_normalized_id() {
        let reply = check_order_status("track ord404", &orders()).unwrap();
        assert!(reply.starts_with("I couldn't find order ORD404."));
    }

    #[test]
    fn test_no_id_is_none() {
        assert_eq!(check_order_status("where is my order", &orders()), None);
    }
}
