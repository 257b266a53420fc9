//! Home Depot receipt parser.
//!
//! Covers the online-order confirmation layout ("Order Total", "Order Date",
//! "Order #W...") and the in-store register layout (SKU rows, SUBTOTAL /
//! SALES TAX / TOTAL block).

use lazy_static::lazy_static;
use regex::Regex;

use super::{first_amount, first_date, first_reference};
use crate::extract::{extract_card_last4, extract_payment_method};
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
        Regex::new(r"(?i)sales\s+tax\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
        Regex::new(r"(?i)\btax\s*:?\s*\$?\s*([\d,]+\.\d{2})").unwrap(),
    ];
    static ref DATE: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s+date\s*:?\s*([^\n]+)").unwrap(),
        Regex::new(r"(?i)\bdate\s*:?\s*([^\n]+)").unwrap(),
        Regex::new(r"(\d{1,2}/\d{1,2}/\d{2,4})").unwrap(),
    ];
    static ref ORDER: Vec<Regex> = vec![
        Regex::new(r"(?i)order\s*#\s*([A-Z]{1,2}\d{6,})").unwrap(),
        Regex::new(r"(?i)order\s*(?:#|no\.?|number)?\s*:?\s*([A-Z0-9][A-Z0-9\-]{5,})").unwrap(),
    ];
}

pub struct HomeDepotParser;

impl VendorParser for HomeDepotParser {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_order_confirmation() {
        let text = "The Home Depot\n\
                    Order #W987654321\n\
                    Order Date: 11/23/2025\n\
                    VISA **** 1234\n\
                    Order Total: $119.76";

        let parsed = HomeDepotParser.parse(text).unwrap();

        assert_eq!(parsed.total, Some(Decimal::from_str("119.76").unwrap()));
        assert_eq!(
            parsed.transaction_date,
            NaiveDate::from_ymd_opt(2025, 11, 23)
        );
        assert_eq!(parsed.card_last4.as_deref(), Some("1234"));
        assert_eq!(parsed.order_number.as_deref(), Some("W987654321"));
        assert_eq!(parsed.confidence, Confidence::High);
    }

    #[test]
    fn test_register_receipt() {
        let text = "THE HOME DEPOT #0472\n\
                    1002345678  2X4X8 KD STUD  12  3.98  47.76\n\
                    1000567890  DECK SCREW 5LB  1  29.97  29.97\n\
                    SUBTOTAL 77.73\n\
                    SALES TAX 6.41\n\
                    TOTAL 84.14\n\
                    11/20/2025";

        let parsed = HomeDepotParser.parse(text).unwrap();

        assert_eq!(parsed.total, Some(Decimal::from_str("84.14").unwrap()));
        assert_eq!(parsed.subtotal, Some(Decimal::from_str("77.73").unwrap()));
        assert_eq!(parsed.tax, Some(Decimal::from_str("6.41").unwrap()));
        assert_eq!(parsed.line_items.len(), 2);
        assert_eq!(parsed.line_items[0].description, "2X4X8 KD STUD");
        // total + date, no reference number
        assert_eq!(parsed.confidence, Confidence::Medium);
    }

    #[test]
    fn test_declines_without_total_or_items() {
        assert!(HomeDepotParser.parse("Your order has shipped.").is_none());
    }
}
