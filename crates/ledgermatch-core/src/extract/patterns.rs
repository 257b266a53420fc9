//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency amounts (US format: $1,234.56 or 1234.56)
    pub static ref AMOUNT: Regex = Regex::new(
        r"(?:\$\s*)?(\d{1,3}(?:,\d{3})*|\d+)\.(\d{2})\b"
    ).unwrap();

    // Labeled totals, most specific labels first
    pub static ref LABELED_TOTAL: Regex = Regex::new(
        r"(?i)(?:order\s+total|grand\s+total|invoice\s+total|total\s+due|amount\s+due|balance\s+due)\s*:?\s*\$?\s*([\d,]+\.\d{2})"
    ).unwrap();

    pub static ref TOTAL_BARE: Regex = Regex::new(
        r"(?i)\btotal\b\s*:?\s*\$?\s*([\d,]+\.\d{2})"
    ).unwrap();

    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)(?:sub\s*-?\s*total|merchandise\s+total)\s*:?\s*\$?\s*([\d,]+\.\d{2})"
    ).unwrap();

    pub static ref TAX: Regex = Regex::new(
        r"(?i)(?:sales\s+tax|estimated\s+tax|\btax)\s*:?\s*\$?\s*([\d,]+\.\d{2})"
    ).unwrap();

    pub static ref SHIPPING: Regex = Regex::new(
        r"(?i)(?:shipping\s*(?:&|and)?\s*handling|shipping|delivery|freight)\s*:?\s*\$?\s*([\d,]+\.\d{2})"
    ).unwrap();

    // Date patterns
    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_LONG: Regex = Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2}),?\s+(\d{4})\b"
    ).unwrap();

    // Labeled transaction dates
    pub static ref LABELED_DATE: Regex = Regex::new(
        r"(?i)(?:order\s+date|invoice\s+date|transaction\s+date|purchase\s+date|date\s+ordered|placed\s+on)\s*:?\s*([^\n]+)"
    ).unwrap();

    // Payment card patterns
    pub static ref CARD_ENDING: Regex = Regex::new(
        r"(?i)(?:ending\s+in|last\s*4(?:\s+digits)?)\s*:?\s*#?\s*(\d{4})\b"
    ).unwrap();

    pub static ref CARD_MASKED: Regex = Regex::new(
        r"(?:\*{2,}|[xX]{2,})\s*(\d{4})\b"
    ).unwrap();

    pub static ref PAYMENT_NETWORK: Regex = Regex::new(
        r"(?i)\b(visa|mastercard|amex|american\s+express|discover|paypal|check|cash)\b"
    ).unwrap();

    // Reference numbers; captures are validated in code (must contain a digit)
    pub static ref ORDER_NUMBER: Regex = Regex::new(
        r"(?i)order\s*(?:#|no\.?|number)?\s*:?\s*#?\s*([A-Z0-9][A-Z0-9\-]{4,})"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s*(?:#|no\.?|number)?\s*:?\s*#?\s*([A-Z0-9][A-Z0-9\-]{3,})"
    ).unwrap();

    pub static ref PO_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:p\.?o\.?|purchase\s+order)\s*(?:#|no\.?|number)?\s*:?\s*#?\s*([A-Z0-9][A-Z0-9\-]{2,})"
    ).unwrap();

    // Summary lines that must not be mistaken for line items
    pub static ref SUMMARY_LINE: Regex = Regex::new(
        r"(?i)^\s*(?:order\s+total|grand\s+total|invoice\s+total|items?\s+subtotal|merchandise\s+total|sub\s*-?\s*total|total|sales\s+tax|estimated\s+tax|tax|shipping|delivery|freight|discount|balance|payment|paid|charged|tender|change|amount\s+due|total\s+due)\b"
    ).unwrap();

    // Line item row shapes, most structured first
    pub static ref ROW_SKU: Regex = Regex::new(
        r"^([A-Za-z0-9]{5,14})\s+(.+?)\s+(\d{1,4})\s+(?:@\s*)?\$?([\d,]+\.\d{2})\s+\$?([\d,]+\.\d{2})$"
    ).unwrap();

    pub static ref ROW_QTY_PRICE: Regex = Regex::new(
        r"(?i)^(.+?)\s+(?:qty:?\s*)?(\d{1,4})\s*[x@]\s*\$?([\d,]+\.\d{2})(?:\s*=?\s*\$?([\d,]+\.\d{2}))?$"
    ).unwrap();

    pub static ref ROW_DESC_PRICE: Regex = Regex::new(
        r"^(.+?)\s+\$([\d,]+\.\d{2})$"
    ).unwrap();
}
