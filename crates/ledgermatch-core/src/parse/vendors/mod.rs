//! Vendor-specific parsers, selected via registry lookup.

mod amazon;
mod grainger;
mod home_depot;
mod lowes;

pub use amazon::AmazonParser;
pub use grainger::GraingerParser;
pub use home_depot::HomeDepotParser;
pub use lowes::LowesParser;

use regex::Regex;
use rust_decimal::Decimal;

use super::VendorParser;
use crate::extract::{parse_amount, parse_date};
use crate::vendor::VendorId;

/// Dedicated parser for a vendor, if one exists. Vendors without one fall
/// through to the generic parser in the router.
pub fn parser_for(id: VendorId) -> Option<&'static dyn VendorParser> {
    match id {
        VendorId::HomeDepot => Some(&HomeDepotParser),
        VendorId::Lowes => Some(&LowesParser),
        VendorId::Amazon => Some(&AmazonParser),
        VendorId::Grainger => Some(&GraingerParser),
        VendorId::Ferguson => None,
    }
}

/// First pattern in the cascade that matches and yields a parseable amount.
pub(crate) fn first_amount(cascade: &[Regex], text: &str) -> Option<Decimal> {
    cascade
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| parse_amount(&caps[1])))
}

/// First pattern in the cascade that matches and yields a parseable date.
pub(crate) fn first_date(cascade: &[Regex], text: &str) -> Option<chrono::NaiveDate> {
    cascade
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| parse_date(&caps[1])))
}

/// First pattern in the cascade whose capture contains a digit.
pub(crate) fn first_reference(cascade: &[Regex], text: &str) -> Option<String> {
    cascade.iter().find_map(|re| {
        re.captures_iter(text)
            .map(|caps| caps[1].to_string())
            .find(|candidate| candidate.chars().any(|c| c.is_ascii_digit()))
    })
}
