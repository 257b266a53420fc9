//! Sync state machine: matched-transaction update vs new-expense creation.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::LedgerError;
use crate::ledger::{EntityResolver, ExpenseLine, LedgerProvider, NewExpense, PurchaseUpdate};
use crate::matching::TransactionMatcher;
use crate::models::{MatchConfig, Receipt, SyncStatus};
use crate::source::Attachment;

/// Drives one receipt from `pending` to a terminal state.
///
/// Resolution and matching decide between annotating an existing ledger
/// transaction (`matched`) and creating a new expense (`synced`). Any
/// resolve or write failure moves the receipt to `error` with the message
/// captured, and the error is re-thrown for batch-level accounting.
pub struct SyncOrchestrator<'a> {
    matcher: TransactionMatcher<'a>,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(config: &'a MatchConfig) -> Self {
        Self {
            matcher: TransactionMatcher::new(config),
        }
    }

    pub fn sync(
        &self,
        receipt: &mut Receipt,
        attachments: &[Attachment],
        ledger: &mut dyn LedgerProvider,
        resolver: &mut EntityResolver,
    ) -> Result<(), LedgerError> {
        let transaction_id = match self.drive(receipt, ledger, resolver) {
            Ok(id) => id,
            Err(e) => {
                receipt.fail(e.to_string());
                return Err(e);
            }
        };

        // Attachment upload happens after the successful state transition
        // and is non-fatal on failure.
        for attachment in attachments {
            if let Err(e) = ledger.attach_receipt(&transaction_id, attachment) {
                warn!("attachment upload failed for {}: {e}", attachment.file_name);
                receipt.note(format!(
                    "attachment {} not uploaded: {e}",
                    attachment.file_name
                ));
            }
        }

        Ok(())
    }

    fn drive(
        &self,
        receipt: &mut Receipt,
        ledger: &mut dyn LedgerProvider,
        resolver: &mut EntityResolver,
    ) -> Result<String, LedgerError> {
        let vendor = resolver.resolve_vendor(ledger, &receipt.vendor_name)?;
        receipt.ledger_vendor_id = Some(vendor.id.clone());

        let customer = resolver.resolve_customer(ledger, &receipt.job_name)?;
        receipt.ledger_customer_id = Some(customer.id.clone());

        let account = resolver.resolve_account(ledger, &receipt.category)?;
        receipt.ledger_account_id = Some(account.id.clone());

        if let Some(matched) = self.matcher.find(receipt, ledger)? {
            let update = PurchaseUpdate {
                customer_id: customer.id.clone(),
                billable: true,
                note: format!("Receipt {} ({})", receipt.id, receipt.document_id),
            };
            ledger.update_purchase(&matched.candidate.id, &update)?;

            info!(
                "receipt {} matched ledger transaction {} (score {})",
                receipt.id, matched.candidate.id, matched.score
            );
            receipt.matched_transaction_id = Some(matched.candidate.id.clone());
            receipt.note(format!(
                "matched ledger transaction {} with score {}",
                matched.candidate.id, matched.score
            ));
            receipt.advance(SyncStatus::Matched);
            Ok(matched.candidate.id)
        } else {
            let expense = build_expense(receipt, &vendor.id, &customer.id, &account.id);
            let created = ledger.create_expense(&expense)?;

            info!("receipt {} synced as new expense {}", receipt.id, created.id);
            receipt.note(format!("created expense {} (no ledger match)", created.id));
            receipt.advance(SyncStatus::Synced);
            Ok(created.id)
        }
    }
}

/// Build the new-expense payload from the receipt's line items, or a single
/// summary line when the receipt has none.
fn build_expense(
    receipt: &Receipt,
    vendor_id: &str,
    customer_id: &str,
    account_id: &str,
) -> NewExpense {
    let total = receipt
        .total
        .or_else(|| {
            receipt
                .line_items
                .iter()
                .map(|item| item.total_price.unwrap_or_default())
                .reduce(|a, b| a + b)
        })
        .unwrap_or_default();

    let lines = if receipt.line_items.is_empty() {
        vec![ExpenseLine {
            description: format!("{} receipt", receipt.vendor_name),
            amount: total,
            quantity: None,
        }]
    } else {
        receipt
            .line_items
            .iter()
            .map(|item| ExpenseLine {
                description: item.description.clone(),
                amount: item
                    .total_price
                    .or(item.unit_price.map(|unit| unit * item.quantity))
                    .unwrap_or(Decimal::ZERO),
                quantity: Some(item.quantity),
            })
            .collect()
    };

    let reference = receipt
        .order_number
        .as_deref()
        .or(receipt.invoice_number.as_deref())
        .or(receipt.po_number.as_deref());
    let memo = match reference {
        Some(reference) => format!("{} {}", receipt.vendor_name, reference),
        None => format!("{} receipt {}", receipt.vendor_name, receipt.id),
    };

    NewExpense {
        vendor_id: vendor_id.to_string(),
        customer_id: customer_id.to_string(),
        account_id: account_id.to_string(),
        date: receipt.transaction_date,
        total,
        lines,
        memo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PurchaseCandidate;
    use crate::models::{OriginKind, ParsedReceipt, ReceiptLineItem};
    use crate::testutil::MemoryLedger;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn receipt() -> Receipt {
        let parsed = ParsedReceipt {
            total: Some(Decimal::from_str("119.76").unwrap()),
            transaction_date: NaiveDate::from_ymd_opt(2025, 11, 23),
            order_number: Some("W987654321".to_string()),
            line_items: vec![ReceiptLineItem {
                description: "2x4x8 KD Stud".to_string(),
                quantity: Decimal::from(12),
                unit_price: Some(Decimal::from_str("3.98").unwrap()),
                total_price: Some(Decimal::from_str("47.76").unwrap()),
            }],
            ..Default::default()
        };
        Receipt::from_parsed(
            "doc-1",
            OriginKind::EmailText,
            Some("home_depot".to_string()),
            "The Home Depot",
            "Job Materials",
            "Smith Kitchen Remodel",
            parsed,
        )
    }

    fn ledger() -> MemoryLedger {
        MemoryLedger::with_vendor("The Home Depot").with_job_materials_account()
    }

    #[test]
    fn test_matched_updates_existing_transaction() {
        let mut ledger = ledger();
        ledger.purchases.push(PurchaseCandidate {
            id: "txn-77".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 23).unwrap(),
            total: Decimal::from_str("119.76").unwrap(),
            vendor: None,
            card_last4: None,
        });

        let config = MatchConfig::default();
        let mut receipt = receipt();
        let mut resolver = EntityResolver::new();

        SyncOrchestrator::new(&config)
            .sync(&mut receipt, &[], &mut ledger, &mut resolver)
            .unwrap();

        assert_eq!(receipt.sync_status, SyncStatus::Matched);
        assert_eq!(receipt.matched_transaction_id.as_deref(), Some("txn-77"));
        assert_eq!(ledger.updates.len(), 1);
        assert_eq!(ledger.updates[0].0, "txn-77");
        assert!(ledger.updates[0].1.billable);
        assert!(ledger.expenses.is_empty());
    }

    #[test]
    fn test_unmatched_creates_expense() {
        let mut ledger = ledger();
        let config = MatchConfig::default();
        let mut receipt = receipt();
        let mut resolver = EntityResolver::new();

        SyncOrchestrator::new(&config)
            .sync(&mut receipt, &[], &mut ledger, &mut resolver)
            .unwrap();

        assert_eq!(receipt.sync_status, SyncStatus::Synced);
        assert_eq!(ledger.expenses.len(), 1);
        let expense = &ledger.expenses[0];
        assert_eq!(expense.total, Decimal::from_str("119.76").unwrap());
        assert_eq!(expense.lines.len(), 1);
        assert_eq!(expense.lines[0].description, "2x4x8 KD Stud");
        assert_eq!(expense.memo, "The Home Depot W987654321");
        // Entities resolved along the way.
        assert_eq!(receipt.ledger_vendor_id.as_deref(), Some("V-1"));
        assert_eq!(ledger.created_jobs, vec!["Smith Kitchen Remodel"]);
    }

    #[test]
    fn test_summary_line_when_no_items() {
        let mut ledger = ledger();
        let config = MatchConfig::default();
        let mut receipt = receipt();
        receipt.line_items.clear();
        let mut resolver = EntityResolver::new();

        SyncOrchestrator::new(&config)
            .sync(&mut receipt, &[], &mut ledger, &mut resolver)
            .unwrap();

        let expense = &ledger.expenses[0];
        assert_eq!(expense.lines.len(), 1);
        assert_eq!(expense.lines[0].description, "The Home Depot receipt");
        assert_eq!(expense.lines[0].amount, Decimal::from_str("119.76").unwrap());
    }

    #[test]
    fn test_write_failure_sets_error_and_rethrows() {
        let mut ledger = ledger();
        ledger.fail_expense_create = true;
        let config = MatchConfig::default();
        let mut receipt = receipt();
        let mut resolver = EntityResolver::new();

        let result = SyncOrchestrator::new(&config).sync(
            &mut receipt,
            &[],
            &mut ledger,
            &mut resolver,
        );

        assert!(result.is_err());
        assert_eq!(receipt.sync_status, SyncStatus::Error);
        assert!(receipt.sync_error.as_deref().unwrap().contains("expense"));
    }

    #[test]
    fn test_attachment_failure_is_non_fatal() {
        let mut ledger = ledger();
        ledger.fail_attach = true;
        let config = MatchConfig::default();
        let mut receipt = receipt();
        let mut resolver = EntityResolver::new();

        let attachments = vec![Attachment {
            file_name: "receipt.pdf".to_string(),
            content: Vec::new(),
        }];

        SyncOrchestrator::new(&config)
            .sync(&mut receipt, &attachments, &mut ledger, &mut resolver)
            .unwrap();

        // Sync outcome stands; the failure is only noted.
        assert_eq!(receipt.sync_status, SyncStatus::Synced);
        assert!(receipt
            .notes
            .iter()
            .any(|note| note.contains("receipt.pdf")));
    }

    #[test]
    fn test_attachments_uploaded_after_success() {
        let mut ledger = ledger();
        let config = MatchConfig::default();
        let mut receipt = receipt();
        let mut resolver = EntityResolver::new();

        let attachments = vec![Attachment {
            file_name: "receipt.pdf".to_string(),
            content: b"%PDF".to_vec(),
        }];

        SyncOrchestrator::new(&config)
            .sync(&mut receipt, &attachments, &mut ledger, &mut resolver)
            .unwrap();

        assert_eq!(ledger.attached.len(), 1);
        assert_eq!(ledger.attached[0].1, "receipt.pdf");
    }
}
