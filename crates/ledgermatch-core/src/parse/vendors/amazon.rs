//! Amazon order confirmation parser.
//!
//! Amazon receipts arrive as HTML email; the HTML path prefers the decoded
//! artifact's structured values and tables, the text path runs the same
//! cascades over derived plain text.

use lazy_static::lazy_static;
use regex::Regex;

use super::{first_amount, first_date, first_reference};
use crate::decode::DecodedArtifact;
use crate::extract::{extract_card_last4, extract_payment_method};
use crate::models::ParsedReceipt;
use crate::parse::generic::GenericParser;
use crate::parse::line_items::extract_line_items;
use crate::parse::{vendor_confidence, VendorParser};

lazy_static! {
    static ref TOTAL: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s+total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)grand\s+total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)\btotal\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref SUBTOTAL: Vec<Regex> = vec![
        Regex::new(r"(?i)item(?:s)?\s+subtotal\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)sub\s*-?\s*total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref TAX: Vec<Regex> = vec![
        Regex::new(r"(?i)estimated\s+tax\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)\btax\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref SHIPPING: Vec<Regex> = vec![
        Regex::new(r"(?i)shipping\s*(?:&|and)?\s*handling\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref DATE: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s+placed\s*:?\s*([^\n]+)").unwrap(),
        Regex::new(r"(?i)placed\s+on\s*:?\s*([^\n]+)").unwrap(),
    ];
    static ref ORDER: Vec<Regex> = vec![
        Regex::new(r"\b(\d{3}-\d{7}-\d{7})\b").unwrap(),
    ];
}

pub struct AmazonParser;

impl VendorParser for AmazonParser {
    fn parse(&self, text: &str) -> Option<ParsedReceipt> {
        let total = first_amount(&TOTAL, text);
        let line_items = extract_line_items(text);

        if total.is_none() && line_items.is_empty() {
            return None;
        }

        let mut parsed = ParsedReceipt {
            total,
            subtotal: first_amount(&SUBTOTAL, text),
            tax: first_amount(&TAX, text),
            shipping: first_amount(&SHIPPING, text),
            transaction_date: first_date(&DATE, text),
            order_number: first_reference(&ORDER, text),
            invoice_number: None,
            po_number: None,
            card_last4: extract_card_last4(text),
            payment_method: extract_payment_method(text),
            line_items,
            confidence: Default::default(),
        };
        parsed.confidence = vendor_confidence(&parsed);
        Some(parsed)
    }

    fn parse_html(&self, _markup: &str, artifact: &DecodedArtifact) -> Option<ParsedReceipt> {
        let mut parsed = self.parse(&artifact.text)?;

        // The decoded artifact's structured values fill anything the text
        // cascades missed; tables give better line items than re-scanning.
        if parsed.total.is_none() {
            parsed.total = artifact.amounts.total;
        }
        if parsed.subtotal.is_none() {
            parsed.subtotal = artifact.amounts.subtotal;
        }
        if parsed.tax.is_none() {
            parsed.tax = artifact.amounts.tax;
        }
        if parsed.shipping.is_none() {
            parsed.shipping = artifact.amounts.shipping;
        }
        if parsed.transaction_date.is_none() {
            parsed.transaction_date = artifact.dates.iter().copied().max();
        }
        if parsed.order_number.is_none() {
            parsed.order_number = artifact.order_number.clone();
        }
        if parsed.card_last4.is_none() {
            parsed.card_last4 = artifact.card_last4.clone();
        }
        if parsed.line_items.is_empty() && !artifact.tables.is_empty() {
            if let Some(generic) = GenericParser::new(None).parse(artifact) {
                parsed.line_items = generic.line_items;
            }
        }

        parsed.confidence = vendor_confidence(&parsed);
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::HtmlDecoder;
    use crate::models::Confidence;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_text_confirmation() {
        let text = "Amazon.com order confirmation\n\
                    Order #113-4567890-1234567\n\
                    Order Placed: November 20, 2025\n\
                    Items Subtotal: $64.00\n\
                    Estimated Tax: $5.28\n\
                    Order Total: $69.28";

        let parsed = AmazonParser.parse(text).unwrap();

        assert_eq!(parsed.total, Some(Decimal::from_str("69.28").unwrap()));
        assert_eq!(parsed.tax, Some(Decimal::from_str("5.28").unwrap()));
        assert_eq!(
            parsed.transaction_date,
            NaiveDate::from_ymd_opt(2025, 11, 20)
        );
        assert_eq!(
            parsed.order_number.as_deref(),
            Some("113-4567890-1234567")
        );
        assert_eq!(parsed.confidence, Confidence::High);
    }

    #[test]
    fn test_html_confirmation_uses_artifact() {
        let markup = r#"
            <html><body>
              <p>Order #113-4567890-1234567</p>
              <p>Placed on 11/20/2025</p>
              <table>
                <tr><td>USB-C cable 6ft</td><td>2</td><td>$12.99</td><td>$25.98</td></tr>
              </table>
              <p>Order Total: $69.28</p>
            </body></html>
        "#;
        let artifact = HtmlDecoder::new().decode(markup);
        let parsed = AmazonParser.parse_html(markup, &artifact).unwrap();

        assert_eq!(parsed.total, Some(Decimal::from_str("69.28").unwrap()));
        assert_eq!(
            parsed.order_number.as_deref(),
            Some("113-4567890-1234567")
        );
        assert_eq!(parsed.line_items.len(), 1);
        assert_eq!(parsed.line_items[0].description, "USB-C cable 6ft");
        assert_eq!(
            parsed.line_items[0].total_price,
            Some(Decimal::from_str("25.98").unwrap())
        );
    }

    #[test]
    fn test_declines_on_shipment_notice() {
        assert!(AmazonParser.parse("Your package was delivered.").is_none());
    }
}
