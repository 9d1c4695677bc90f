//! Budgets module - department spending caps and their tracked spend.

mod budgets_model;
mod budgets_service;
mod budgets_traits;


pub use budgets_model::{
    Budget, BudgetPeriod, BudgetStatus, BudgetUpdate, BudgetWithStatus, NewBudget,
};
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
