use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::vendors_model::{BlacklistAttempt, Vendor, VendorAnalytics};
use super::vendors_traits::{VendorRepositoryTrait, VendorServiceTrait};
use crate::analytics::{percentage, spend_by_category};
use crate::constants::TOP_N;
use crate::errors::Result;
use crate::expenses::{ExpenseFilter, ExpenseRepositoryTrait, ExpenseStatus};
use crate::policies::compliance::RULE_BLACKLISTED_VENDOR;
use crate::users::{Actor, Role};

/// Service for vendor spend statistics
pub struct VendorService {
    repository: Arc<dyn VendorRepositoryTrait>,
    expense_repository: Arc<dyn ExpenseRepositoryTrait>,
}

impl VendorService {
    pub fn new(
        repository: Arc<dyn VendorRepositoryTrait>,
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            expense_repository,
        }
    }

    fn sorted_vendors(&self, company_id: &str) -> Result<Vec<Vendor>> {
        let mut vendors = self.repository.list(company_id)?;
        vendors.sort_by(|a, b| {
            b.total_spent
                .cmp(&a.total_spent)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(vendors)
    }
}

#[async_trait]
impl VendorServiceTrait for VendorService {
    fn list_vendors(&self, actor: &Actor) -> Result<Vec<Vendor>> {
        actor.require(&Role::STAFF, "view vendors")?;
        self.sorted_vendors(&actor.company_id)
    }

    fn vendor_analytics(&self, actor: &Actor) -> Result<VendorAnalytics> {
        actor.require(&Role::STAFF, "view vendor analytics")?;
        let vendors = self.sorted_vendors(&actor.company_id)?;
        let total_spent: Decimal = vendors.iter().map(|v| v.total_spent).sum();
        let top_vendors: Vec<Vendor> = vendors.iter().take(TOP_N).cloned().collect();
        let top_spent: Decimal = top_vendors.iter().map(|v| v.total_spent).sum();

        let expenses = self
            .expense_repository
            .list(&actor.company_id, &ExpenseFilter::default())?;
        let approved: Vec<_> = expenses
            .iter()
            .filter(|e| e.status == ExpenseStatus::Approved)
            .cloned()
            .collect();

        let mut attempts: BTreeMap<String, BlacklistAttempt> = BTreeMap::new();
        for expense in expenses
            .iter()
            .filter(|e| e.violations.iter().any(|v| v.rule == RULE_BLACKLISTED_VENDOR))
        {
            let entry = attempts
                .entry(expense.vendor.trim().to_ascii_lowercase())
                .or_insert_with(|| BlacklistAttempt {
                    vendor: expense.vendor.clone(),
                    attempts: 0,
                    amount: Decimal::ZERO,
                });
            entry.attempts += 1;
            entry.amount += expense.amount;
        }
        let mut blacklist_attempts: Vec<BlacklistAttempt> = attempts.into_values().collect();
        blacklist_attempts.sort_by(|a, b| b.attempts.cmp(&a.attempts));

        Ok(VendorAnalytics {
            vendor_count: vendors.len(),
            total_spent,
            top_vendor_share: percentage(top_spent, total_spent),
            top_vendors,
            spend_by_category: spend_by_category(&approved),
            blacklist_attempts,
        })
    }

    async fn refresh_vendor(&self, company_id: &str, vendor: &str) -> Result<Vendor> {
        let refreshed = self.repository.refresh(company_id, vendor).await?;
        debug!(
            "Vendor '{}' now {} transaction(s), {} total",
            refreshed.name, refreshed.transaction_count, refreshed.total_spent
        );
        Ok(refreshed)
    }
}
