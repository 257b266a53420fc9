//! Single-file JSON ledger.
//!
//! A serde-backed stand-in for the external accounting system, so the full
//! pipeline is drivable end-to-end without any remote service.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgermatch_core::error::LedgerError;
use ledgermatch_core::ledger::{
    EntityRef, ExpenseLine, LedgerProvider, NewExpense, PurchaseCandidate, PurchaseFilter,
    PurchaseUpdate,
};
use ledgermatch_core::source::Attachment;

/// An account with its type; only `expense` accounts are offered to the
/// resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub id: String,
    pub name: String,
    #[serde(default = "default_account_kind")]
    pub kind: String,
}

fn default_account_kind() -> String {
    "expense".to_string()
}

/// A purchase transaction on file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerPurchase {
    pub id: String,
    pub date: NaiveDate,
    pub total: Decimal,
    #[serde(default)]
    pub vendor: Option<EntityRef>,
    #[serde(default)]
    pub card_last4: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub billable: bool,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// An expense created by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExpense {
    pub id: String,
    pub vendor_id: String,
    pub customer_id: String,
    pub account_id: String,
    pub date: Option<NaiveDate>,
    pub total: Decimal,
    pub memo: String,
    pub lines: Vec<ExpenseLine>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LedgerFile {
    vendors: Vec<EntityRef>,
    customers: Vec<EntityRef>,
    accounts: Vec<LedgerAccount>,
    purchases: Vec<LedgerPurchase>,
    expenses: Vec<LedgerExpense>,
}

pub struct JsonLedger {
    path: PathBuf,
    data: LedgerFile,
}

impl JsonLedger {
    /// Load the ledger file, or start an empty one if it does not exist.
    pub fn load(path: &Path) -> io::Result<Self> {
        let data = if path.exists() {
            serde_json::from_str(&fs::read_to_string(path)?)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?
        } else {
            LedgerFile::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn save(&self) -> io::Result<()> {
        let content = serde_json::to_string_pretty(&self.data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(&self.path, content)
    }

    fn fuzzy(entities: &[EntityRef], name: &str) -> Option<EntityRef> {
        let needle = name.to_lowercase();
        entities
            .iter()
            .find(|e| {
                let candidate = e.name.to_lowercase();
                candidate.contains(&needle) || needle.contains(&candidate)
            })
            .cloned()
    }
}

impl LedgerProvider for JsonLedger {
    fn query_purchases(
        &self,
        filter: &PurchaseFilter,
    ) -> Result<Vec<PurchaseCandidate>, LedgerError> {
        Ok(self
            .data
            .purchases
            .iter()
            .filter(|p| p.date >= filter.date_from && p.date <= filter.date_to)
            .map(|p| PurchaseCandidate {
                id: p.id.clone(),
                date: p.date,
                total: p.total,
                vendor: p.vendor.clone(),
                card_last4: p.card_last4.clone(),
            })
            .collect())
    }

    fn find_vendor(&self, name: &str) -> Result<Option<EntityRef>, LedgerError> {
        Ok(Self::fuzzy(&self.data.vendors, name))
    }

    fn create_vendor(&mut self, name: &str) -> Result<EntityRef, LedgerError> {
        let entity = EntityRef {
            id: format!("V-{}", self.data.vendors.len() + 1),
            name: name.to_string(),
        };
        self.data.vendors.push(entity.clone());
        Ok(entity)
    }

    fn find_customer(&self, name: &str) -> Result<Option<EntityRef>, LedgerError> {
        Ok(Self::fuzzy(&self.data.customers, name))
    }

    fn create_customer_job(&mut self, name: &str) -> Result<EntityRef, LedgerError> {
        let entity = EntityRef {
            id: format!("C-{}", self.data.customers.len() + 1),
            name: name.to_string(),
        };
        self.data.customers.push(entity.clone());
        Ok(entity)
    }

    fn find_account(&self, name: &str) -> Result<Option<EntityRef>, LedgerError> {
        let needle = name.to_lowercase();
        Ok(self
            .data
            .accounts
            .iter()
            .filter(|a| a.kind == "expense")
            .find(|a| {
                let candidate = a.name.to_lowercase();
                candidate.contains(&needle) || needle.contains(&candidate)
            })
            .map(|a| EntityRef {
                id: a.id.clone(),
                name: a.name.clone(),
            }))
    }

    fn list_expense_accounts(&self) -> Result<Vec<EntityRef>, LedgerError> {
        Ok(self
            .data
            .accounts
            .iter()
            .filter(|a| a.kind == "expense")
            .map(|a| EntityRef {
                id: a.id.clone(),
                name: a.name.clone(),
            })
            .collect())
    }

    fn update_purchase(&mut self, id: &str, update: &PurchaseUpdate) -> Result<(), LedgerError> {
        let purchase = self
            .data
            .purchases
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::Update {
                id: id.to_string(),
                reason: "no such transaction".to_string(),
            })?;

        purchase.customer_id = Some(update.customer_id.clone());
        purchase.billable = update.billable;
        purchase.notes.push(update.note.clone());
        Ok(())
    }

    fn create_expense(&mut self, expense: &NewExpense) -> Result<EntityRef, LedgerError> {
        let id = format!("E-{}", self.data.expenses.len() + 1);
        self.data.expenses.push(LedgerExpense {
            id: id.clone(),
            vendor_id: expense.vendor_id.clone(),
            customer_id: expense.customer_id.clone(),
            account_id: expense.account_id.clone(),
            date: expense.date,
            total: expense.total,
            memo: expense.memo.clone(),
            lines: expense.lines.clone(),
            attachments: Vec::new(),
        });
        Ok(EntityRef {
            id,
            name: expense.memo.clone(),
        })
    }

    fn attach_receipt(
        &mut self,
        transaction_id: &str,
        attachment: &Attachment,
    ) -> Result<(), LedgerError> {
        if let Some(purchase) = self
            .data
            .purchases
            .iter_mut()
            .find(|p| p.id == transaction_id)
        {
            purchase.attachments.push(attachment.file_name.clone());
            return Ok(());
        }
        if let Some(expense) = self
            .data
            .expenses
            .iter_mut()
            .find(|e| e.id == transaction_id)
        {
            expense.attachments.push(attachment.file_name.clone());
            return Ok(());
        }
        Err(LedgerError::Update {
            id: transaction_id.to_string(),
            reason: "no such transaction".to_string(),
        })
    }
}
