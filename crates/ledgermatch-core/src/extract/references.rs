//! Order, invoice, and purchase-order number extraction.

use regex::Regex;

use super::patterns::{INVOICE_NUMBER, ORDER_NUMBER, PO_NUMBER};

/// First capture that looks like a real reference: label words such as
/// "Total" also match the character class, so a digit is required.
fn first_with_digit(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .find(|candidate| candidate.chars().any(|c| c.is_ascii_digit()))
}

pub fn extract_order_number(text: &str) -> Option<String> {
    first_with_digit(&ORDER_NUMBER, text)
}

pub fn extract_invoice_number(text: &str) -> Option<String> {
    first_with_digit(&INVOICE_NUMBER, text)
}

pub fn extract_po_number(text: &str) -> Option<String> {
    first_with_digit(&PO_NUMBER, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number() {
        assert_eq!(
            extract_order_number("Order #W987654321").as_deref(),
            Some("W987654321")
        );
        assert_eq!(
            extract_order_number("Order Number: 123-4567890-1234567").as_deref(),
            Some("123-4567890-1234567")
        );
    }

    #[test]
    fn test_order_label_without_digits_is_skipped() {
        // "Order Total" must not be read as an order number.
        assert_eq!(extract_order_number("Order Total: $119.76"), None);
    }

    #[test]
    fn test_invoice_number() {
        assert_eq!(
            extract_invoice_number("INVOICE 88412").as_deref(),
            Some("88412")
        );
    }

    #[test]
    fn test_po_number() {
        assert_eq!(
            extract_po_number("PO # 4500021877").as_deref(),
            Some("4500021877")
        );
        assert_eq!(extract_po_number("PO Box 552"), None);
    }
}
