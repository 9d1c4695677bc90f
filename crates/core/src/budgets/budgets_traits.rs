use async_trait::async_trait;

use super::budgets_model::{Budget, BudgetUpdate, BudgetWithStatus, NewBudget};
use crate::errors::Result;
use crate::expenses::Expense;
use crate::users::Actor;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn list(&self, company_id: &str, department: Option<&str>) -> Result<Vec<Budget>>;
    fn get_by_id(&self, company_id: &str, budget_id: &str) -> Result<Budget>;
    /// Inserts a normalized budget with zero spend.
    async fn create(&self, company_id: &str, new_budget: NewBudget) -> Result<Budget>;
    async fn update(&self, budget: Budget) -> Result<Budget>;
    /// Sums the approved expenses inside the budget window and stores the
    /// total, reading and writing in one transaction.
    async fn recompute_spent(&self, company_id: &str, budget_id: &str) -> Result<Budget>;
    async fn delete(&self, company_id: &str, budget_id: &str) -> Result<usize>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn list_budgets(&self, actor: &Actor) -> Result<Vec<BudgetWithStatus>>;
    fn get_budget(&self, actor: &Actor, budget_id: &str) -> Result<BudgetWithStatus>;
    async fn create_budget(&self, actor: &Actor, new_budget: NewBudget)
        -> Result<BudgetWithStatus>;
    async fn update_budget(
        &self,
        actor: &Actor,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<BudgetWithStatus>;
    async fn delete_budget(&self, actor: &Actor, budget_id: &str) -> Result<()>;
    /// Recomputes `spent` for every budget of the actor's company.
    async fn recalculate_all(&self, actor: &Actor) -> Result<Vec<BudgetWithStatus>>;
    /// Recomputes the budgets an approved expense counts against.
    async fn apply_approved_expense(&self, expense: &Expense) -> Result<Vec<Budget>>;
}
