use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::budgets_model::{Budget, BudgetUpdate, BudgetWithStatus, NewBudget};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::errors::Result;
use crate::expenses::Expense;
use crate::users::{Actor, Role};
use crate::Error;

/// Service for budget caps and their spend tracking.
///
/// `spent` is always recomputed from the approved expenses inside the budget
/// window rather than incremented, so repeated recalculation is idempotent.
/// The repository sums and stores in one write transaction.
pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
}

impl BudgetService {
    pub fn new(repository: Arc<dyn BudgetRepositoryTrait>) -> Self {
        Self { repository }
    }

    async fn refresh_spent(&self, budget: Budget) -> Result<Budget> {
        let refreshed = self
            .repository
            .recompute_spent(&budget.company_id, &budget.id)
            .await?;
        if refreshed.spent != budget.spent {
            debug!(
                "Budget {} spent {} -> {}",
                budget.id, budget.spent, refreshed.spent
            );
        }
        Ok(refreshed)
    }

    fn visible_budget(&self, actor: &Actor, budget_id: &str) -> Result<Budget> {
        actor.require(&Role::STAFF, "view budgets")?;
        let budget = self.repository.get_by_id(&actor.company_id, budget_id)?;
        if let Some(department) = actor.department_scope() {
            if budget.department != department {
                return Err(Error::PermissionDenied(
                    "managers can only view their own department's budgets".to_string(),
                ));
            }
        }
        Ok(budget)
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn list_budgets(&self, actor: &Actor) -> Result<Vec<BudgetWithStatus>> {
        actor.require(&Role::STAFF, "view budgets")?;
        Ok(self
            .repository
            .list(&actor.company_id, actor.department_scope())?
            .into_iter()
            .map(BudgetWithStatus::from)
            .collect())
    }

    fn get_budget(&self, actor: &Actor, budget_id: &str) -> Result<BudgetWithStatus> {
        self.visible_budget(actor, budget_id).map(Into::into)
    }

    async fn create_budget(
        &self,
        actor: &Actor,
        new_budget: NewBudget,
    ) -> Result<BudgetWithStatus> {
        actor.require(&Role::FINANCE_ADMINS, "create budgets")?;
        let new_budget = new_budget.normalized()?;
        let budget = self.repository.create(&actor.company_id, new_budget).await?;
        info!(
            "Budget {} created for {} by {}",
            budget.id, budget.department, actor.user_id
        );
        Ok(self.refresh_spent(budget).await?.into())
    }

    async fn update_budget(
        &self,
        actor: &Actor,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<BudgetWithStatus> {
        actor.require(&Role::FINANCE_ADMINS, "update budgets")?;
        let mut budget = self.repository.get_by_id(&actor.company_id, budget_id)?;
        let moves_window = update.moves_window();
        update.apply_to(&mut budget)?;
        let budget = self.repository.update(budget).await?;
        let budget = if moves_window {
            self.refresh_spent(budget).await?
        } else {
            budget
        };
        Ok(budget.into())
    }

    async fn delete_budget(&self, actor: &Actor, budget_id: &str) -> Result<()> {
        actor.require(&Role::FINANCE_ADMINS, "delete budgets")?;
        if self.repository.delete(&actor.company_id, budget_id).await? == 0 {
            return Err(Error::NotFound("Budget".to_string()));
        }
        info!("Budget {} deleted by {}", budget_id, actor.user_id);
        Ok(())
    }

    async fn recalculate_all(&self, actor: &Actor) -> Result<Vec<BudgetWithStatus>> {
        actor.require(&Role::FINANCE_ADMINS, "recalculate budgets")?;
        let budgets = self.repository.list(&actor.company_id, None)?;
        let mut refreshed = Vec::with_capacity(budgets.len());
        for budget in budgets {
            refreshed.push(self.refresh_spent(budget).await?.into());
        }
        info!(
            "Recalculated {} budget(s) for company {}",
            refreshed.len(),
            actor.company_id
        );
        Ok(refreshed)
    }

    async fn apply_approved_expense(&self, expense: &Expense) -> Result<Vec<Budget>> {
        let affected: Vec<Budget> = self
            .repository
            .list(&expense.company_id, Some(&expense.department))?
            .into_iter()
            .filter(|b| b.covers(expense))
            .collect();
        let mut updated = Vec::with_capacity(affected.len());
        for budget in affected {
            updated.push(self.refresh_spent(budget).await?);
        }
        Ok(updated)
    }
}
