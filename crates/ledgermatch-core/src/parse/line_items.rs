//! Line item extraction from receipt text.

use rust_decimal::Decimal;

use crate::extract::parse_amount;
use crate::extract::patterns::{ROW_DESC_PRICE, ROW_QTY_PRICE, ROW_SKU, SUMMARY_LINE};
use crate::models::ReceiptLineItem;

/// Apply the row-shape patterns to each line independently, in document
/// order. Lines whose leading token is a summary keyword are skipped so the
/// total is never double-counted as an item.
pub fn extract_line_items(text: &str) -> Vec<ReceiptLineItem> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse one line against the row shapes, most structured first:
/// SKU + description + qty + unit price + extended price, then
/// description + qty + price, then description + price.
pub fn parse_line(line: &str) -> Option<ReceiptLineItem> {
    let line = line.trim();
    if line.is_empty() || SUMMARY_LINE.is_match(line) {
        return None;
    }

    // SKU tokens must carry a digit; a leading word would match the class too.
    if let Some(caps) = ROW_SKU.captures(line) {
        let sku_ok = caps[1].chars().any(|c| c.is_ascii_digit());
        if let (true, Some(quantity), Some(unit), Some(total)) = (
            sku_ok,
            parse_quantity(&caps[3]),
            parse_amount(&caps[4]),
            parse_amount(&caps[5]),
        ) {
            let description = caps[2].trim().to_string();
            if has_letter(&description) {
                return Some(ReceiptLineItem {
                    description,
                    quantity,
                    unit_price: Some(unit),
                    total_price: Some(total),
                });
            }
        }
    }

    if let Some(caps) = ROW_QTY_PRICE.captures(line) {
        if let (Some(quantity), Some(unit)) = (parse_quantity(&caps[2]), parse_amount(&caps[3])) {
            let description = caps[1].trim().to_string();
            if has_letter(&description) {
                let total = caps
                    .get(4)
                    .and_then(|m| parse_amount(m.as_str()))
                    .unwrap_or(unit * quantity);
                return Some(ReceiptLineItem {
                    description,
                    quantity,
                    unit_price: Some(unit),
                    total_price: Some(total),
                });
            }
        }
    }

    if let Some(caps) = ROW_DESC_PRICE.captures(line) {
        let description = caps[1].trim().to_string();
        if has_letter(&description) {
            if let Some(total) = parse_amount(&caps[2]) {
                return Some(ReceiptLineItem {
                    description,
                    quantity: Decimal::ONE,
                    unit_price: None,
                    total_price: Some(total),
                });
            }
        }
    }

    None
}

fn parse_quantity(s: &str) -> Option<Decimal> {
    let quantity: i64 = s.parse().ok()?;
    (1..10_000).contains(&quantity).then(|| Decimal::from(quantity))
}

fn has_letter(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic())
}
