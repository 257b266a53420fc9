//! Parser routing: vendor-specific cascades with a generic fallback.

pub mod generic;
pub mod line_items;
pub mod vendors;

pub use generic::{score_confidence, GenericParser};
pub use line_items::extract_line_items;

use tracing::debug;

use crate::decode::DecodedArtifact;
use crate::models::{Confidence, ParsedReceipt};
use crate::vendor::VendorProfile;

/// Contract implemented by each vendor-specific parser.
pub trait VendorParser: Sync {
    /// Parse plain text. Returns `None` only when neither a total nor any
    /// line item could be extracted; partial results are returned with a
    /// confidence label reflecting the gap.
    fn parse(&self, text: &str) -> Option<ParsedReceipt>;

    /// Parse HTML markup alongside its decoded artifact. The default
    /// implementation parses the derived plain text.
    fn parse_html(&self, _markup: &str, artifact: &DecodedArtifact) -> Option<ParsedReceipt> {
        self.parse(&artifact.text)
    }
}

/// Route a decoded artifact to the right parser.
///
/// The vendor's dedicated parser is tried first; `None` from it is a soft
/// signal, not an error, and the router falls through to the generic parser
/// with the profile's field patterns as hints. Empty decoded text
/// short-circuits to `None` without invoking any parser.
pub fn parse_artifact(
    artifact: &DecodedArtifact,
    markup: Option<&str>,
    vendor: Option<&'static VendorProfile>,
) -> Option<ParsedReceipt> {
    if artifact.is_empty() {
        return None;
    }

    if let Some(profile) = vendor {
        if let Some(parser) = vendors::parser_for(profile.id) {
            let result = match markup {
                Some(markup) => parser.parse_html(markup, artifact),
                None => parser.parse(&artifact.text),
            };
            if result.is_some() {
                return result;
            }
            debug!(
                "vendor parser {} declined, falling back to generic",
                profile.id.as_str()
            );
        }
    }

    GenericParser::new(vendor).parse(artifact)
}

/// Deterministic confidence for vendor-specific parse results: `High`
/// requires total + date + at least one reference number, `Medium` requires
/// total + date, anything less is `Low`.
pub fn vendor_confidence(parsed: &ParsedReceipt) -> Confidence {
    let has_core = parsed.total.is_some() && parsed.transaction_date.is_some();
    match (has_core, parsed.has_reference()) {
        (true, true) => Confidence::High,
        (true, false) => Confidence::Medium,
        _ => Confidence::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::{profile, VendorId};
    use rust_decimal::Decimal;

    #[test]
    fn test_empty_text_short_circuits() {
        let artifact = DecodedArtifact::from_text("   \n  ");
        let vendor = Some(profile(VendorId::HomeDepot));
        assert!(parse_artifact(&artifact, None, vendor).is_none());
    }

    #[test]
    fn test_fallthrough_matches_generic_with_hints() {
        // Ferguson has no dedicated parser: routing must be identical to
        // calling the generic parser directly with its profile as hints.
        let vendor = profile(VendorId::Ferguson);
        let artifact = DecodedArtifact::from_text(
            "Ferguson Enterprises\nInvoice # 6012345\nInvoice Total: $412.08\n11/20/2025",
        );

        let routed = parse_artifact(&artifact, None, Some(vendor)).unwrap();
        let direct = GenericParser::new(Some(vendor)).parse(&artifact).unwrap();

        assert_eq!(routed.total, direct.total);
        assert_eq!(routed.transaction_date, direct.transaction_date);
        assert_eq!(routed.order_number, direct.order_number);
        assert_eq!(routed.invoice_number, direct.invoice_number);
        assert_eq!(routed.confidence, direct.confidence);
    }

    #[test]
    fn test_vendor_confidence_tiers() {
        let mut parsed = ParsedReceipt {
            total: Some(Decimal::new(1099, 2)),
            transaction_date: chrono::NaiveDate::from_ymd_opt(2025, 11, 23),
            ..Default::default()
        };
        assert_eq!(vendor_confidence(&parsed), Confidence::Medium);

        parsed.order_number = Some("W987654321".to_string());
        assert_eq!(vendor_confidence(&parsed), Confidence::High);

        parsed.total = None;
        assert_eq!(vendor_confidence(&parsed), Confidence::Low);
    }
}
