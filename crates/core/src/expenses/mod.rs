//! Expenses module - submission, review and the approval audit trail.

mod approvals_model;
mod expenses_model;
mod expenses_service;
mod expenses_traits;


pub use approvals_model::{Approval, ApprovalAction, ExpenseDecision};
pub use expenses_model::{
    Expense, ExpenseCategory, ExpenseFilter, ExpenseStatus, ExpenseUpdate, NewExpense, Severity,
    Violation,
};
pub use expenses_service::ExpenseService;
pub use expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
