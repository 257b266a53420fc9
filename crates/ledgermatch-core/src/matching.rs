//! Fuzzy matching of a receipt against a window of ledger purchases.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::{LedgerProvider, PurchaseCandidate, PurchaseFilter};
use crate::models::{MatchConfig, Receipt};

/// A candidate accepted by the matcher, with its score.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub candidate: PurchaseCandidate,
    pub score: i32,
}

/// Scores ledger purchase candidates against a receipt.
///
/// At the default threshold of 80, accepting a match requires an exact or
/// near-exact amount, or an exact amount corroborated by date or card.
/// Anything weaker becomes a new expense instead of a risky update.
pub struct TransactionMatcher<'a> {
    config: &'a MatchConfig,
}

impl<'a> TransactionMatcher<'a> {
    pub fn new(config: &'a MatchConfig) -> Self {
        Self { config }
    }

    /// Query the ledger for purchases dated within the window around the
    /// receipt date and return the best candidate at or above the accept
    /// threshold. Ties go to the first-seen candidate in ledger query order.
    pub fn find(
        &self,
        receipt: &Receipt,
        ledger: &dyn LedgerProvider,
    ) -> Result<Option<MatchOutcome>, LedgerError> {
        let Some(date) = receipt.transaction_date else {
            return Ok(None);
        };

        let window = chrono::Duration::days(self.config.window_days);
        let filter = PurchaseFilter {
            date_from: date - window,
            date_to: date + window,
        };

        let candidates = ledger.query_purchases(&filter)?;
        debug!("{} candidates within {} days", candidates.len(), self.config.window_days);

        let mut best: Option<(i32, PurchaseCandidate)> = None;
        for candidate in candidates {
            let score = score_candidate(receipt, &candidate);
            // Strictly-greater keeps the first-seen candidate on ties.
            if best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, candidate));
            }
        }

        Ok(best.and_then(|(score, candidate)| {
            if score >= self.config.accept_threshold {
                debug!("accepted candidate {} with score {}", candidate.id, score);
                Some(MatchOutcome { candidate, score })
            } else {
                debug!("best score {} below threshold, no match", score);
                None
            }
        }))
    }
}

/// Additive similarity score between a receipt and one candidate.
///
/// Amount delta: 0 -> +100, <0.10 -> +80, <1.00 -> +50, <5.00 -> +20.
/// Date: exact -> +30, within one day -> +20.
/// Card last-4 equal (when both sides have one) -> +50.
pub fn score_candidate(receipt: &Receipt, candidate: &PurchaseCandidate) -> i32 {
    let mut score = 0;

    if let Some(total) = receipt.total {
        let delta = (total - candidate.total).abs();
        score += if delta.is_zero() {
            100
        } else if delta < Decimal::new(10, 2) {
            80
        } else if delta < Decimal::new(100, 2) {
            50
        } else if delta < Decimal::new(500, 2) {
            20
        } else {
            0
        };
    }

    if let Some(date) = receipt.transaction_date {
        let days_off = (date - candidate.date).num_days().abs();
        score += match days_off {
            0 => 30,
            1 => 20,
            _ => 0,
        };
    }

    if let (Some(ours), Some(theirs)) = (&receipt.card_last4, &candidate.card_last4) {
        if ours == theirs {
            score += 50;
        }
    }

    score
}
