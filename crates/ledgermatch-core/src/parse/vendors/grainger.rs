//! Grainger order confirmation parser.
//!
//! Grainger sends PDF order confirmations keyed to a purchase order; item
//! rows carry a numeric catalog number.

use lazy_static::lazy_static;
use regex::Regex;

use super::{first_amount, first_date, first_reference};
use crate::extract::extract_card_last4;
use crate::models::ParsedReceipt;
use crate::parse::line_items::extract_line_items;
use crate::parse::{vendor_confidence, VendorParser};

lazy_static! {
    static ref TOTAL: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s+total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)\btotal\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref SUBTOTAL: Vec<Regex> = vec![
        Regex::new(r"(?i)sub\s*-?\s*total\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref TAX: Vec<Regex> = vec![
        Regex::new(r"(?i)\btax\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref SHIPPING: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:freight|shipping)\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref DATE: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s+date\s*:?\s*([^\n]+)").unwrap(),
        Regex::new(r"(\d{1,2}/\d{1,2}/\d{2,4})").unwrap(),
    ];
    static ref ORDER: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s*(?:#|no\.?|number)?\s*:?\s*(\d{7,})").unwrap(),
    ];
    static ref PO: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:p\.?o\.?|purchase\s+order)\s*(?:#|no\.?|number)?\s*:?\s*([A-Z0-9][A-Z0-9\-]{2,})").unwrap(),
    ];
}

pub struct GraingerParser;

impl VendorParser for GraingerParser {
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
            po_number: first_reference(&PO, text),
            card_last4: extract_card_last4(text),
            payment_method: None,
            line_items,
            confidence: Default::default(),
        };
        parsed.confidence = vendor_confidence(&parsed);
        Some(parsed)
    }
}
