//! Payment card suffix and payment method extraction.

use super::patterns::{CARD_ENDING, CARD_MASKED, PAYMENT_NETWORK};

/// Last four digits of the payment card, from a labeled suffix
/// ("ending in 1234") or a masked number ("**** 1234").
pub fn extract_card_last4(text: &str) -> Option<String> {
    if let Some(caps) = CARD_ENDING.captures(text) {
        return Some(caps[1].to_string());
    }
    CARD_MASKED.captures(text).map(|caps| caps[1].to_string())
}

/// Payment method, normalized to a display name.
pub fn extract_payment_method(text: &str) -> Option<String> {
    let caps = PAYMENT_NETWORK.captures(text)?;
    let key = caps[1]
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let name = match key.as_str() {
        "visa" => "Visa",
        "mastercard" => "Mastercard",
        "amex" | "american express" => "American Express",
        "discover" => "Discover",
        "paypal" => "PayPal",
        "check" => "Check",
        "cash" => "Cash",
        _ => return None,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_card() {
        assert_eq!(
            extract_card_last4("VISA **** 1234").as_deref(),
            Some("1234")
        );
        assert_eq!(
            extract_card_last4("Card xxxxxxxxxxxx5678").as_deref(),
            Some("5678")
        );
    }

    #[test]
    fn test_ending_in() {
        assert_eq!(
            extract_card_last4("Visa ending in 4242").as_deref(),
            Some("4242")
        );
    }

    #[test]
    fn test_no_card() {
        assert_eq!(extract_card_last4("paid in cash"), None);
    }

    #[test]
    fn test_payment_method() {
        assert_eq!(
            extract_payment_method("VISA **** 1234").as_deref(),
            Some("Visa")
        );
        assert_eq!(
            extract_payment_method("American  Express").as_deref(),
            Some("American Express")
        );
    }
}
