//! HTML decoding: plain text, tables, and labeled values from email markup.

use lazy_static::lazy_static;
use scraper::{Html, Node, Selector};
use tracing::debug;

use super::DecodedArtifact;
use crate::extract::{
    extract_all_dates, extract_card_last4, extract_invoice_number, extract_labeled_amounts,
    extract_order_number,
};

lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").unwrap();
    static ref ROW: Selector = Selector::parse("tr").unwrap();
    static ref CELL: Selector = Selector::parse("td, th").unwrap();
}

/// HTML decoder.
///
/// Derives plain text with script/style stripped, extracts every table as
/// rows of cell text, and scans the text for labeled amounts, reference and
/// card substrings, and all normalizable dates.
pub struct HtmlDecoder;

impl HtmlDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, markup: &str) -> DecodedArtifact {
        let doc = Html::parse_document(markup);

        let text = visible_text(&doc);
        let tables = extract_tables(&doc);

        debug!(
            "decoded HTML: {} chars of text, {} tables",
            text.len(),
            tables.len()
        );

        let amounts = extract_labeled_amounts(&text);
        let dates = extract_all_dates(&text);
        let order_number =
            extract_order_number(&text).or_else(|| extract_invoice_number(&text));
        let card_last4 = extract_card_last4(&text);

        DecodedArtifact {
            text,
            tables,
            amounts,
            dates,
            order_number,
            card_last4,
            ocr_confidence: None,
        }
    }
}

impl Default for HtmlDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Text content of every node outside script/style/head, one line per text
/// node, intra-node whitespace collapsed.
fn visible_text(doc: &Html) -> String {
    let mut lines: Vec<String> = Vec::new();

    for node in doc.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(el)
                    if matches!(el.name(), "script" | "style" | "head"))
            });
            if hidden {
                continue;
            }

            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !collapsed.is_empty() {
                lines.push(collapsed);
            }
        }
    }

    lines.join("\n")
}

/// Every table as an ordered sequence of rows of cell text.
fn extract_tables(doc: &Html) -> Vec<Vec<Vec<String>>> {
    let mut tables = Vec::new();

    for table in doc.select(&TABLE) {
        let mut rows = Vec::new();
        for row in table.select(&ROW) {
            let cells: Vec<String> = row
                .select(&CELL)
                .map(|cell| {
                    cell.text()
                        .collect::<Vec<_>>()
                        .join(" ")
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        if !rows.is_empty() {
            tables.push(rows);
        }
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const MARKUP: &str = r#"
        <html>
          <head><style>body { color: red; }</style></head>
          <body>
            <script>var tracking = "ignore me 99.99";</script>
            <p>Order #123-4567890-1234567 placed on 11/20/2025</p>
            <table>
              <tr><th>Item</th><th>Qty</th><th>Price</th></tr>
              <tr><td>Deck screws</td><td>2</td><td>$14.97</td></tr>
            </table>
            <p>Order Total: $29.94</p>
            <p>Visa ending in 4242</p>
          </body>
        </html>
    "#;

    #[test]
    fn test_strips_script_and_style() {
        let artifact = HtmlDecoder::new().decode(MARKUP);
        assert!(!artifact.text.contains("tracking"));
        assert!(!artifact.text.contains("color: red"));
        assert!(artifact.text.contains("Deck screws"));
    }

    #[test]
    fn test_extracts_tables() {
        let artifact = HtmlDecoder::new().decode(MARKUP);
        assert_eq!(artifact.tables.len(), 1);
        assert_eq!(artifact.tables[0].len(), 2);
        assert_eq!(artifact.tables[0][1][0], "Deck screws");
        assert_eq!(artifact.tables[0][1][2], "$14.97");
    }

    #[test]
    fn test_extracts_labeled_values() {
        let artifact = HtmlDecoder::new().decode(MARKUP);
        assert_eq!(
            artifact.amounts.total,
            Some(Decimal::from_str("29.94").unwrap())
        );
        assert_eq!(
            artifact.order_number.as_deref(),
            Some("123-4567890-1234567")
        );
        assert_eq!(artifact.card_last4.as_deref(), Some("4242"));
        assert_eq!(artifact.dates.len(), 1);
    }
}
