//! Find-or-create resolution of ledger entities with run-scoped caches.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::LedgerError;
use crate::ledger::{EntityRef, LedgerProvider};

/// Keywords that identify a job-cost expense account when searching by
/// category name fails.
const ACCOUNT_KEYWORDS: &[&str] = &["job", "material", "supply", "supplies", "cost of goods"];

/// Find-or-create resolver for vendors, customer/jobs, and expense accounts.
///
/// Each flow caches by name for the duration of one pipeline run so repeated
/// receipts from the same vendor or job do not repeat lookups or create
/// duplicates. Caches must be reset before the next run; ledger-side
/// entities may have changed in between.
#[derive(Debug, Default)]
pub struct EntityResolver {
    vendors: HashMap<String, EntityRef>,
    customers: HashMap<String, EntityRef>,
    accounts: HashMap<String, EntityRef>,
}

impl EntityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate every cache. Called between pipeline runs.
    pub fn reset(&mut self) {
        self.vendors.clear();
        self.customers.clear();
        self.accounts.clear();
    }

    /// Find or create the ledger vendor with this display name.
    pub fn resolve_vendor(
        &mut self,
        ledger: &mut dyn LedgerProvider,
        name: &str,
    ) -> Result<EntityRef, LedgerError> {
        let key = name.to_lowercase();
        if let Some(cached) = self.vendors.get(&key) {
            return Ok(cached.clone());
        }

        let entity = match ledger.find_vendor(name)? {
            Some(found) => found,
            None => {
                info!("creating ledger vendor {name}");
                ledger.create_vendor(name)?
            }
        };
        self.vendors.insert(key, entity.clone());
        Ok(entity)
    }

    /// Find or create the customer/project with this name. New customers are
    /// created as jobs (sub-entities).
    pub fn resolve_customer(
        &mut self,
        ledger: &mut dyn LedgerProvider,
        name: &str,
    ) -> Result<EntityRef, LedgerError> {
        let key = name.to_lowercase();
        if let Some(cached) = self.customers.get(&key) {
            return Ok(cached.clone());
        }

        let entity = match ledger.find_customer(name)? {
            Some(found) => found,
            None => {
                info!("creating ledger customer/job {name}");
                ledger.create_customer_job(name)?
            }
        };
        self.customers.insert(key, entity.clone());
        Ok(entity)
    }

    /// Resolve the expense account for a category.
    ///
    /// Staged fallback: search by category name, then keyword-match all
    /// expense accounts against job/material/supply/cost-of-goods terms,
    /// then take the first expense account found, so the result is non-null
    /// whenever any expense account exists.
    pub fn resolve_account(
        &mut self,
        ledger: &mut dyn LedgerProvider,
        category: &str,
    ) -> Result<EntityRef, LedgerError> {
        let key = category.to_lowercase();
        if let Some(cached) = self.accounts.get(&key) {
            return Ok(cached.clone());
        }

        let entity = match ledger.find_account(category)? {
            Some(found) => found,
            None => {
                let all = ledger.list_expense_accounts()?;
                let by_keyword = all.iter().find(|account| {
                    let name = account.name.to_lowercase();
                    ACCOUNT_KEYWORDS.iter().any(|kw| name.contains(kw))
                });
                match by_keyword.or_else(|| all.first()) {
                    Some(found) => {
                        debug!(
                            "no account named {category:?}, falling back to {}",
                            found.name
                        );
                        found.clone()
                    }
                    None => return Err(LedgerError::NoExpenseAccount),
                }
            }
        };
        self.accounts.insert(key, entity.clone());
        Ok(entity)
    }
}
