//! Field extraction primitives shared by every parser.
//!
//! The two fallback policies used by the generic parser live here as named
//! functions ([`amounts::largest_amount`], [`dates::most_recent_date`]) so
//! they stay independently testable.

pub mod amounts;
pub mod cards;
pub mod dates;
pub mod patterns;
pub mod references;

pub use amounts::{extract_labeled_amounts, largest_amount, parse_amount, LabeledAmounts};
pub use cards::{extract_card_last4, extract_payment_method};
pub use dates::{extract_all_dates, labeled_date, most_recent_date, parse_date};
pub use references::{extract_invoice_number, extract_order_number, extract_po_number};
