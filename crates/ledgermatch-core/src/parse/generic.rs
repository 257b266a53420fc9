//! Generic fallback parser for unknown vendors and declined vendor parses.

use rust_decimal::Decimal;
use tracing::trace;

use crate::decode::DecodedArtifact;
use crate::extract::{
    extract_card_last4, extract_invoice_number, extract_labeled_amounts, extract_order_number,
    extract_payment_method, extract_po_number, labeled_date, largest_amount, most_recent_date,
    parse_amount, parse_date,
};
use crate::extract::patterns::SUMMARY_LINE;
use crate::models::{Confidence, ParsedReceipt, ReceiptLineItem};
use crate::parse::line_items::extract_line_items;
use crate::vendor::VendorProfile;

/// Heuristic parser used when no vendor profile exists or the dedicated
/// parser declined.
///
/// Per field: profile hint patterns first (when a profile is supplied),
/// then the artifact's structured accessors (HTML), then vendor-agnostic
/// default patterns, then the named fallback policies: largest amount as
/// total, most recent date as transaction date.
pub struct GenericParser<'a> {
    profile: Option<&'a VendorProfile>,
}

impl<'a> GenericParser<'a> {
    pub fn new(profile: Option<&'a VendorProfile>) -> Self {
        Self { profile }
    }

    pub fn parse(&self, artifact: &DecodedArtifact) -> Option<ParsedReceipt> {
        let text = artifact.text.as_str();
        if text.trim().is_empty() {
            return None;
        }

        let hints = self.profile.map(|p| &p.hints);
        let labeled = extract_labeled_amounts(text);

        let total = hints
            .and_then(|h| h.total.as_ref())
            .and_then(|re| re.captures(text))
            .and_then(|caps| parse_amount(&caps[1]))
            .or(artifact.amounts.total)
            .or(labeled.total)
            .or_else(|| largest_amount(text));

        let subtotal = artifact.amounts.subtotal.or(labeled.subtotal);
        let tax = artifact.amounts.tax.or(labeled.tax);
        let shipping = artifact.amounts.shipping.or(labeled.shipping);

        let transaction_date = hints
            .and_then(|h| h.date.as_ref())
            .and_then(|re| re.captures(text))
            .and_then(|caps| parse_date(&caps[1]))
            .or_else(|| labeled_date(text))
            .or_else(|| {
                if artifact.dates.is_empty() {
                    most_recent_date(text)
                } else {
                    artifact.dates.iter().copied().max()
                }
            });

        let order_number = hints
            .and_then(|h| h.reference.as_ref())
            .and_then(|re| re.captures(text))
            .map(|caps| caps[1].to_string())
            .or_else(|| extract_order_number(text))
            .or_else(|| artifact.order_number.clone());
        let invoice_number = extract_invoice_number(text);
        let po_number = extract_po_number(text);

        let card_last4 = extract_card_last4(text).or_else(|| artifact.card_last4.clone());
        let payment_method = extract_payment_method(text);

        let line_items = if artifact.tables.is_empty() {
            extract_line_items(text)
        } else {
            let from_tables = table_line_items(&artifact.tables);
            if from_tables.is_empty() {
                extract_line_items(text)
            } else {
                from_tables
            }
        };

        let mut parsed = ParsedReceipt {
            total,
            subtotal,
            tax,
            shipping,
            transaction_date,
            order_number,
            invoice_number,
            po_number,
            card_last4,
            payment_method,
            line_items,
            confidence: Confidence::Low,
        };

        if parsed.total.is_none() && parsed.line_items.is_empty() {
            trace!("generic parse found neither total nor line items");
            return None;
        }

        parsed.confidence = score_confidence(&parsed);
        Some(parsed)
    }
}

/// Point-based confidence shared by every parser that does not use the
/// vendor-specific derivation: +2 total, +2 date, +1 reference number,
/// +1 card suffix, +1 line item; >=5 high, >=3 medium, else low.
pub fn score_confidence(parsed: &ParsedReceipt) -> Confidence {
    let mut points = 0;
    if parsed.total.is_some() {
        points += 2;
    }
    if parsed.transaction_date.is_some() {
        points += 2;
    }
    if parsed.has_reference() {
        points += 1;
    }
    if parsed.card_last4.is_some() {
        points += 1;
    }
    if !parsed.line_items.is_empty() {
        points += 1;
    }

    match points {
        p if p >= 5 => Confidence::High,
        p if p >= 3 => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Build line items from decoded HTML tables: one item per row carrying a
/// description and at least one amount. Header and summary rows are skipped.
fn table_line_items(tables: &[Vec<Vec<String>>]) -> Vec<ReceiptLineItem> {
    let mut items = Vec::new();

    for table in tables {
        for row in table {
            let Some(first) = row.first() else { continue };
            if SUMMARY_LINE.is_match(first) {
                continue;
            }

            let description = row
                .iter()
                .filter(|cell| cell.chars().any(|c| c.is_alphabetic()))
                .max_by_key(|cell| cell.len())
                .map(|cell| cell.trim().to_string());
            let Some(description) = description else { continue };

            let amounts: Vec<Decimal> = row
                .iter()
                .filter(|cell| cell.contains('.'))
                .filter_map(|cell| parse_amount(cell))
                .collect();
            let (unit_price, total_price) = match amounts.as_slice() {
                [] => continue,
                [only] => (None, *only),
                [first, .., last] => (Some(*first), *last),
            };

            let quantity = row
                .iter()
                .find_map(|cell| {
                    let q: i64 = cell.trim().parse().ok()?;
                    (1..10_000).contains(&q).then(|| Decimal::from(q))
                })
                .unwrap_or(Decimal::ONE);

            items.push(ReceiptLineItem {
                description,
                quantity,
                unit_price,
                total_price: Some(total_price),
            });
        }
    }

    items
}
