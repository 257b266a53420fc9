//! Ledger provider seam: typed operations against the external accounting
//! system of record.

pub mod resolver;

pub use resolver::EntityResolver;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::source::Attachment;

/// Reference to a ledger-side entity (vendor, customer/job, account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

/// A ledger purchase transaction considered for reconciliation.
///
/// Fetched transiently for each match attempt and never cached across runs;
/// ledger state can change between runs.
#[derive(Debug, Clone)]
pub struct PurchaseCandidate {
    pub id: String,
    pub date: NaiveDate,
    pub total: Decimal,
    pub vendor: Option<EntityRef>,
    pub card_last4: Option<String>,
}

/// Date-bounded filter for purchase queries.
#[derive(Debug, Clone)]
pub struct PurchaseFilter {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Line-level changes applied to a matched purchase transaction.
#[derive(Debug, Clone)]
pub struct PurchaseUpdate {
    /// Customer/job to bill the transaction's lines to.
    pub customer_id: String,
    /// Mark the lines billable.
    pub billable: bool,
    /// Provenance note appended to the transaction.
    pub note: String,
}

/// One line of a new expense transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub description: String,
    pub amount: Decimal,
    pub quantity: Option<Decimal>,
}

/// Payload for a newly created expense transaction.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub vendor_id: String,
    pub customer_id: String,
    pub account_id: String,
    pub date: Option<NaiveDate>,
    pub total: Decimal,
    pub lines: Vec<ExpenseLine>,
    pub memo: String,
}

/// Operations the reconciliation engine needs from the ledger.
///
/// Any call may fail with [`LedgerError::Auth`], which the orchestrator
/// propagates rather than retries; retry is the next cycle's concern.
pub trait LedgerProvider {
    /// Purchase transactions inside the filter's date window, in ledger
    /// result order (used for first-seen tie-breaking).
    fn query_purchases(
        &self,
        filter: &PurchaseFilter,
    ) -> Result<Vec<PurchaseCandidate>, LedgerError>;

    /// Fuzzy vendor lookup by name.
    fn find_vendor(&self, name: &str) -> Result<Option<EntityRef>, LedgerError>;

    fn create_vendor(&mut self, name: &str) -> Result<EntityRef, LedgerError>;

    /// Fuzzy customer/project lookup by name.
    fn find_customer(&self, name: &str) -> Result<Option<EntityRef>, LedgerError>;

    /// Create a customer flagged as a sub-entity/job.
    fn create_customer_job(&mut self, name: &str) -> Result<EntityRef, LedgerError>;

    /// Fuzzy account lookup by name.
    fn find_account(&self, name: &str) -> Result<Option<EntityRef>, LedgerError>;

    /// Every expense-type account, in provider order.
    fn list_expense_accounts(&self) -> Result<Vec<EntityRef>, LedgerError>;

    fn update_purchase(&mut self, id: &str, update: &PurchaseUpdate) -> Result<(), LedgerError>;

    fn create_expense(&mut self, expense: &NewExpense) -> Result<EntityRef, LedgerError>;

    /// Attach a receipt file to a transaction. Failures are non-fatal to the
    /// sync outcome already recorded.
    fn attach_receipt(
        &mut self,
        transaction_id: &str,
        attachment: &Attachment,
    ) -> Result<(), LedgerError>;
}
