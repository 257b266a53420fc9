//! Receipt data models and the sync status state machine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse trust label for a parse result, derived from which fields were
/// successfully extracted. Ordering is meaningful: `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Self::Low
    }
}

/// What kind of raw artifact a receipt was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
    /// Plain-text email body or text document.
    EmailText,
    /// HTML email body.
    EmailHtml,
    /// PDF attachment.
    PdfAttachment,
    /// Scanned image attachment (OCR).
    ImageAttachment,
}

/// A single purchased item in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLineItem {
    /// Product/service description.
    pub description: String,

    /// Quantity purchased.
    pub quantity: Decimal,

    /// Price per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    /// Extended price for the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
}

/// The immediate result of parsing one decoded document.
///
/// Transient: folded into a [`Receipt`] right after parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Grand total.
    pub total: Option<Decimal>,

    /// Pre-tax subtotal.
    pub subtotal: Option<Decimal>,

    /// Sales tax.
    pub tax: Option<Decimal>,

    /// Shipping/delivery charge.
    pub shipping: Option<Decimal>,

    /// Transaction date.
    pub transaction_date: Option<NaiveDate>,

    /// Order number.
    pub order_number: Option<String>,

    /// Invoice number.
    pub invoice_number: Option<String>,

    /// Purchase order number.
    pub po_number: Option<String>,

    /// Last four digits of the payment card.
    pub card_last4: Option<String>,

    /// Payment method (card network or named method).
    pub payment_method: Option<String>,

    /// Line items in document order.
    pub line_items: Vec<ReceiptLineItem>,

    /// How trustworthy this parse is.
    pub confidence: Confidence,
}

impl ParsedReceipt {
    /// Whether any reference number (order, invoice, PO) was extracted.
    pub fn has_reference(&self) -> bool {
        self.order_number.is_some() || self.invoice_number.is_some() || self.po_number.is_some()
    }

    /// A parse with neither a total nor a transaction date carries no
    /// actionable signal and is treated as unparsable downstream.
    pub fn is_actionable(&self) -> bool {
        self.total.is_some() || self.transaction_date.is_some()
    }
}

/// Position of a receipt in the sync lifecycle.
///
/// Progression is forward-only: `Pending -> Matched | Synced | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Not yet reconciled against the ledger.
    Pending,
    /// Reconciled against an existing ledger transaction.
    Matched,
    /// A new expense transaction was created for it.
    Synced,
    /// Resolution or write failed; eligible for manual re-drive.
    Error,
}

impl SyncStatus {
    /// Whether the status can no longer advance.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SyncStatus::Pending)
    }
}

/// The durable record for one parsed purchase document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Globally unique id, generated once at creation.
    pub id: Uuid,

    /// Source document id this receipt was built from.
    pub document_id: String,

    /// Kind of raw artifact the fields were extracted from.
    pub origin: OriginKind,

    /// Detected vendor registry id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    /// Vendor display name used on the ledger side.
    pub vendor_name: String,

    /// Resolved ledger vendor entity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_vendor_id: Option<String>,

    pub total: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub transaction_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Job/project this expense bills to.
    pub job_name: String,

    /// Resolved ledger customer/job entity id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_customer_id: Option<String>,

    /// Expense category name.
    pub category: String,

    /// Resolved ledger expense account id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_account_id: Option<String>,

    pub line_items: Vec<ReceiptLineItem>,

    /// File names of source attachments carried with this receipt.
    pub attachments: Vec<String>,

    pub confidence: Confidence,

    pub sync_status: SyncStatus,

    /// Error message captured when sync failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<String>,

    /// Ledger transaction id this receipt was matched to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_transaction_id: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Append-only log of pipeline decisions.
    pub notes: Vec<String>,
}

impl Receipt {
    /// Fold a parse result into a new receipt. Called once per successfully
    /// decoded document; the receipt is mutated afterwards, never re-created.
    pub fn from_parsed(
        document_id: impl Into<String>,
        origin: OriginKind,
        vendor_id: Option<String>,
        vendor_name: impl Into<String>,
        category: impl Into<String>,
        job_name: impl Into<String>,
        parsed: ParsedReceipt,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document_id.into(),
            origin,
            vendor_id,
            vendor_name: vendor_name.into(),
            ledger_vendor_id: None,
            total: parsed.total,
            subtotal: parsed.subtotal,
            tax: parsed.tax,
            shipping: parsed.shipping,
            transaction_date: parsed.transaction_date,
            order_number: parsed.order_number,
            invoice_number: parsed.invoice_number,
            po_number: parsed.po_number,
            card_last4: parsed.card_last4,
            payment_method: parsed.payment_method,
            job_name: job_name.into(),
            ledger_customer_id: None,
            category: category.into(),
            ledger_account_id: None,
            line_items: parsed.line_items,
            attachments: Vec::new(),
            confidence: parsed.confidence,
            sync_status: SyncStatus::Pending,
            sync_error: None,
            matched_transaction_id: None,
            created_at: Utc::now(),
            notes: Vec::new(),
        }
    }

    /// Append a processing note.
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    /// Advance the sync status. Returns `false` (leaving the status
    /// unchanged) when the receipt is already in a terminal state: status
    /// never reverts or moves sideways.
    pub fn advance(&mut self, next: SyncStatus) -> bool {
        if self.sync_status.is_terminal() || next == SyncStatus::Pending {
            return false;
        }
        self.sync_status = next;
        true
    }

    /// Record a sync failure: status to `Error`, message captured.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.note(format!("sync failed: {message}"));
        if self.advance(SyncStatus::Error) {
            self.sync_error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> Receipt {
        Receipt::from_parsed(
            "doc-1",
            OriginKind::EmailText,
            None,
            "Test Vendor",
            "Job Materials",
            "Unassigned",
            ParsedReceipt::default(),
        )
    }

    #[test]
    fn test_status_advances_forward_only() {
        let mut r = receipt();
        assert_eq!(r.sync_status, SyncStatus::Pending);

        assert!(r.advance(SyncStatus::Matched));
        assert_eq!(r.sync_status, SyncStatus::Matched);

        // No input can make a terminal status revert or move.
        assert!(!r.advance(SyncStatus::Pending));
        assert!(!r.advance(SyncStatus::Synced));
        assert!(!r.advance(SyncStatus::Error));
        assert_eq!(r.sync_status, SyncStatus::Matched);
    }

    #[test]
    fn test_pending_cannot_be_reentered() {
        let mut r = receipt();
        assert!(!r.advance(SyncStatus::Pending));
        assert_eq!(r.sync_status, SyncStatus::Pending);
    }

    #[test]
    fn test_fail_captures_message_once() {
        let mut r = receipt();
        r.fail("boom");
        assert_eq!(r.sync_status, SyncStatus::Error);
        assert_eq!(r.sync_error.as_deref(), Some("boom"));

        // A later failure cannot overwrite the terminal state.
        r.fail("again");
        assert_eq!(r.sync_error.as_deref(), Some("boom"));
        assert_eq!(r.notes.len(), 2);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn test_actionable_requires_total_or_date() {
        let empty = ParsedReceipt::default();
        assert!(!empty.is_actionable());

        let with_total = ParsedReceipt {
            total: Some(Decimal::new(1099, 2)),
            ..Default::default()
        };
        assert!(with_total.is_actionable());
    }
}
