//! Lowe's receipt parser.
//!
//! Lowe's receipts are invoice-numbered; both the emailed invoice layout
//! ("INVOICE 88412", "INVOICE TOTAL") and register tape are covered.

use lazy_static::lazy_static;
use regex::Regex;

use super::{first_amount, first_date, first_reference};
use crate::extract::{extract_card_last4, extract_payment_method};
use crate::models::ParsedReceipt;
use crate::parse::line_items::extract_line_items;
use crate::parse::{vendor_confidence, VendorParser};

lazy_static! {
    static ref TOTAL: Vec<Regex> = vec![
        Regex::new(r"(?i)invoice\s+total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)\btotal\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref SUBTOTAL: Vec<Regex> = vec![
        Regex::new(r"(?i)sub\s*-?\s*total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref TAX: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:sales\s+)?tax\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref DATE: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:sales|invoice)\s+date\s*:?\s*([^\n]+)").unwrap(),
        Regex::new(r"(\d{1,2}/\d{1,2}/\d{2,4})").unwrap(),
    ];
    static ref INVOICE: Vec<Regex> = vec![
        Regex::new(r"(?i)invoice\s*#?\s*:?\s*(\d{5,})").unwrap(),
    ];
}

pub struct LowesParser;

impl VendorParser for LowesParser {
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
            shipping: None,
            transaction_date: first_date(&DATE, text),
            order_number: None,
            invoice_number: first_reference(&INVOICE, text),
            po_number: None,
            card_last4: extract_card_last4(text),
            payment_method: extract_payment_method(text),
            line_items,
            confidence: Default::default(),
        };
        parsed.confidence = vendor_confidence(&parsed);
        Some(parsed)
    }
}
