//! Currency amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT, LABELED_TOTAL, SHIPPING, SUBTOTAL, TAX, TOTAL_BARE};

/// Labeled monetary values found in a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledAmounts {
    pub total: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub shipping: Option<Decimal>,
}

impl LabeledAmounts {
    pub fn is_empty(&self) -> bool {
        self.total.is_none()
            && self.subtotal.is_none()
            && self.tax.is_none()
            && self.shipping.is_none()
    }
}

/// Parse a US-formatted amount (e.g., "$1,234.56" or "1234.56") into a
/// fixed-point decimal with cents precision.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(&cleaned).ok().map(|d| d.round_dp(2))
}

/// All well-formed currency-shaped amounts in the text, in source order.
pub fn extract_all_amounts(text: &str) -> Vec<Decimal> {
    AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let joined = format!("{}.{}", &caps[1], &caps[2]);
            parse_amount(&joined)
        })
        .collect()
}

/// Largest currency-shaped amount in the text.
///
/// Fallback policy for the grand total: the total is usually the biggest
/// number a receipt prints.
pub fn largest_amount(text: &str) -> Option<Decimal> {
    extract_all_amounts(text).into_iter().max()
}

/// Scan text for labeled monetary values (total/subtotal/tax/shipping).
///
/// Total labels are tried most-specific first; a bare "Total" label is only
/// consulted on lines that do not also carry a subtotal label.
pub fn extract_labeled_amounts(text: &str) -> LabeledAmounts {
    let mut out = LabeledAmounts::default();

    if let Some(caps) = LABELED_TOTAL.captures(text) {
        out.total = parse_amount(&caps[1]);
    }
    if out.total.is_none() {
        for line in text.lines() {
            if SUBTOTAL.is_match(line) {
                continue;
            }
            if let Some(caps) = TOTAL_BARE.captures(line) {
                if let Some(amount) = parse_amount(&caps[1]) {
                    out.total = Some(amount);
                    break;
                }
            }
        }
    }

    if let Some(caps) = SUBTOTAL.captures(text) {
        out.subtotal = parse_amount(&caps[1]);
    }
    if let Some(caps) = TAX.captures(text) {
        out.tax = parse_amount(&caps[1]);
    }
    if let Some(caps) = SHIPPING.captures(text) {
        out.shipping = parse_amount(&caps[1]);
    }

    out
}
