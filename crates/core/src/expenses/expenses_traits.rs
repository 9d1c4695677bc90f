use async_trait::async_trait;

use super::approvals_model::{Approval, ExpenseDecision};
use super::expenses_model::{Expense, ExpenseFilter, ExpenseUpdate, NewExpense};
use crate::errors::Result;
use crate::users::Actor;

/// Trait for expense repository operations.
///
/// The `*_open` writes are conditional on the stored expense still being
/// pending or flagged; they report a lost race as `None` / `0` instead of an
/// error so the service can map it to a conflict.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    fn get_by_id(&self, company_id: &str, expense_id: &str) -> Result<Expense>;
    fn list(&self, company_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>>;
    fn list_approvals(&self, company_id: &str, expense_id: &str) -> Result<Vec<Approval>>;
    /// Inserts the expense and, for auto-approved expenses, its audit record
    /// in one transaction.
    async fn create(&self, expense: Expense, approval: Option<Approval>) -> Result<Expense>;
    async fn update_open(
        &self,
        expense: Expense,
        approval: Option<Approval>,
    ) -> Result<Option<Expense>>;
    async fn record_decision(
        &self,
        decision: ExpenseDecision,
    ) -> Result<Option<(Expense, Approval)>>;
    async fn delete_open(&self, company_id: &str, expense_id: &str) -> Result<usize>;
}

/// Trait for expense service operations
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    async fn submit_expense(&self, actor: &Actor, new_expense: NewExpense) -> Result<Expense>;
    fn get_expense(&self, actor: &Actor, expense_id: &str) -> Result<Expense>;
    fn list_expenses(&self, actor: &Actor, filter: ExpenseFilter) -> Result<Vec<Expense>>;
    async fn update_expense(
        &self,
        actor: &Actor,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense>;
    async fn delete_expense(&self, actor: &Actor, expense_id: &str) -> Result<()>;
    async fn approve_expense(
        &self,
        actor: &Actor,
        expense_id: &str,
        comments: Option<String>,
    ) -> Result<Expense>;
    async fn reject_expense(&self, actor: &Actor, expense_id: &str, reason: String)
        -> Result<Expense>;
    fn list_approvals(&self, actor: &Actor, expense_id: &str) -> Result<Vec<Approval>>;
}
