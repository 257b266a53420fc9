//! In-memory source and ledger providers shared by unit tests.

use std::cell::Cell;

use crate::error::{LedgerError, SourceError};
use crate::ledger::{
    EntityRef, LedgerProvider, NewExpense, PurchaseCandidate, PurchaseFilter, PurchaseUpdate,
};
use crate::source::{Attachment, DocumentRef, SourceDocument, SourceProvider};

#[derive(Default)]
pub(crate) struct MemoryLedger {
    pub vendors: Vec<EntityRef>,
    pub customers: Vec<EntityRef>,
    pub expense_accounts: Vec<EntityRef>,
    pub purchases: Vec<PurchaseCandidate>,
    pub updates: Vec<(String, PurchaseUpdate)>,
    pub expenses: Vec<NewExpense>,
    pub attached: Vec<(String, String)>,
    pub created_vendors: Vec<String>,
    pub created_jobs: Vec<String>,
    pub find_vendor_calls: Cell<usize>,
    pub fail_expense_create: bool,
    pub fail_attach: bool,
    pub auth_down: bool,
}

impl MemoryLedger {
    pub fn entity(id: &str, name: &str) -> EntityRef {
        EntityRef {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    pub fn with_vendor(name: &str) -> Self {
        let mut ledger = Self::default();
        ledger.vendors.push(Self::entity("V-1", name));
        ledger
    }

    /// Seed one "Job Materials" expense account.
    pub fn with_job_materials_account(mut self) -> Self {
        self.expense_accounts
            .push(Self::entity("A-1", "Job Materials"));
        self
    }

    fn check_auth(&self) -> Result<(), LedgerError> {
        if self.auth_down {
            Err(LedgerError::Auth("token expired".to_string()))
        } else {
            Ok(())
        }
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

impl LedgerProvider for MemoryLedger {
    fn query_purchases(
        &self,
        filter: &PurchaseFilter,
    ) -> Result<Vec<PurchaseCandidate>, LedgerError> {
        self.check_auth()?;
        Ok(self
            .purchases
            .iter()
            .filter(|p| p.date >= filter.date_from && p.date <= filter.date_to)
            .cloned()
            .collect())
    }

    fn find_vendor(&self, name: &str) -> Result<Option<EntityRef>, LedgerError> {
        self.check_auth()?;
        self.find_vendor_calls.set(self.find_vendor_calls.get() + 1);
        Ok(Self::fuzzy(&self.vendors, name))
    }

    fn create_vendor(&mut self, name: &str) -> Result<EntityRef, LedgerError> {
        self.check_auth()?;
        let entity = Self::entity(&format!("V-{}", self.vendors.len() + 1), name);
        self.vendors.push(entity.clone());
        self.created_vendors.push(name.to_string());
        Ok(entity)
    }

    fn find_customer(&self, name: &str) -> Result<Option<EntityRef>, LedgerError> {
        self.check_auth()?;
        Ok(Self::fuzzy(&self.customers, name))
    }

    fn create_customer_job(&mut self, name: &str) -> Result<EntityRef, LedgerError> {
        self.check_auth()?;
        let entity = Self::entity(&format!("C-{}", self.customers.len() + 1), name);
        self.customers.push(entity.clone());
        self.created_jobs.push(name.to_string());
        Ok(entity)
    }

    fn find_account(&self, name: &str) -> Result<Option<EntityRef>, LedgerError> {
        self.check_auth()?;
        Ok(Self::fuzzy(&self.expense_accounts, name))
    }

    fn list_expense_accounts(&self) -> Result<Vec<EntityRef>, LedgerError> {
        self.check_auth()?;
        Ok(self.expense_accounts.clone())
    }

    fn update_purchase(&mut self, id: &str, update: &PurchaseUpdate) -> Result<(), LedgerError> {
        self.check_auth()?;
        if !self.purchases.iter().any(|p| p.id == id) {
            return Err(LedgerError::Update {
                id: id.to_string(),
                reason: "no such transaction".to_string(),
            });
        }
        self.updates.push((id.to_string(), update.clone()));
        Ok(())
    }

    fn create_expense(&mut self, expense: &NewExpense) -> Result<EntityRef, LedgerError> {
        self.check_auth()?;
        if self.fail_expense_create {
            return Err(LedgerError::Create {
                entity: "expense".to_string(),
                reason: "validation failed".to_string(),
            });
        }
        let entity = Self::entity(&format!("E-{}", self.expenses.len() + 1), &expense.memo);
        self.expenses.push(expense.clone());
        Ok(entity)
    }

    fn attach_receipt(
        &mut self,
        transaction_id: &str,
        attachment: &Attachment,
    ) -> Result<(), LedgerError> {
        self.check_auth()?;
        if self.fail_attach {
            return Err(LedgerError::Update {
                id: transaction_id.to_string(),
                reason: "attachment rejected".to_string(),
            });
        }
        self.attached
            .push((transaction_id.to_string(), attachment.file_name.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemorySource {
    pub docs: Vec<(DocumentRef, SourceDocument)>,
    pub processed: Vec<String>,
    pub fail_mark: bool,
}

impl MemorySource {
    pub fn push_text(&mut self, id: &str, sender: &str, subject: &str, text: &str) {
        self.docs.push((
            DocumentRef::new(id),
            SourceDocument {
                sender: sender.to_string(),
                subject: subject.to_string(),
                text: Some(text.to_string()),
                ..Default::default()
            },
        ));
    }

    pub fn push_attachment(&mut self, id: &str, file_name: &str, content: &[u8]) {
        self.docs.push((
            DocumentRef::new(id),
            SourceDocument {
                subject: file_name.to_string(),
                attachments: vec![Attachment {
                    file_name: file_name.to_string(),
                    content: content.to_vec(),
                }],
                ..Default::default()
            },
        ));
    }
}

impl SourceProvider for MemorySource {
    fn list_unprocessed(&self) -> Result<Vec<DocumentRef>, SourceError> {
        Ok(self
            .docs
            .iter()
            .map(|(doc_ref, _)| doc_ref.clone())
            .filter(|doc_ref| !self.processed.contains(&doc_ref.id))
            .collect())
    }

    fn fetch(&self, document: &DocumentRef) -> Result<SourceDocument, SourceError> {
        self.docs
            .iter()
            .find(|(doc_ref, _)| doc_ref == document)
            .map(|(_, doc)| doc.clone())
            .ok_or_else(|| SourceError::Fetch {
                id: document.id.clone(),
                reason: "unknown document".to_string(),
            })
    }

    fn mark_processed(&mut self, document: &DocumentRef) -> Result<(), SourceError> {
        if self.fail_mark {
            return Err(SourceError::MarkProcessed(document.id.clone()));
        }
        self.processed.push(document.id.clone());
        Ok(())
    }
}
