//! Domain event types.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expenses::{Expense, ExpenseCategory, ExpenseStatus};

/// Domain events emitted by core services after successful mutations.
///
/// The serialized form is the webhook payload, so variant names are the
/// public event names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum DomainEvent {
    /// An employee submitted a new expense (whatever the compliance outcome).
    #[serde(rename = "expense.submitted")]
    ExpenseSubmitted { expense: ExpenseSnapshot },

    /// An expense reached the approved state.
    #[serde(rename = "expense.approved")]
    ExpenseApproved {
        expense: ExpenseSnapshot,
        #[serde(rename = "approverId")]
        approver_id: String,
        /// True when the policy engine approved it without human review
        automatic: bool,
    },

    /// A reviewer rejected an expense.
    #[serde(rename = "expense.rejected")]
    ExpenseRejected {
        expense: ExpenseSnapshot,
        #[serde(rename = "approverId")]
        approver_id: String,
        reason: String,
    },
}

/// Flat view of an expense carried by events.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSnapshot {
    pub id: String,
    pub company_id: String,
    pub employee_id: String,
    pub department: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: ExpenseCategory,
    pub vendor: String,
    pub expense_date: NaiveDate,
    pub status: ExpenseStatus,
    pub violation_count: usize,
    pub occurred_at: NaiveDateTime,
}

impl From<&Expense> for ExpenseSnapshot {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.clone(),
            company_id: expense.company_id.clone(),
            employee_id: expense.employee_id.clone(),
            department: expense.department.clone(),
            amount: expense.amount,
            currency: expense.currency.clone(),
            category: expense.category,
            vendor: expense.vendor.clone(),
            expense_date: expense.expense_date,
            status: expense.status,
            violation_count: expense.violations.len(),
            occurred_at: expense.updated_at,
        }
    }
}

impl DomainEvent {
    /// Creates an ExpenseSubmitted event.
    pub fn expense_submitted(expense: &Expense) -> Self {
        Self::ExpenseSubmitted {
            expense: expense.into(),
        }
    }

    /// Creates an ExpenseApproved event.
    pub fn expense_approved(expense: &Expense, approver_id: &str, automatic: bool) -> Self {
        Self::ExpenseApproved {
            expense: expense.into(),
            approver_id: approver_id.to_string(),
            automatic,
        }
    }

    /// Creates an ExpenseRejected event.
    pub fn expense_rejected(expense: &Expense, approver_id: &str, reason: &str) -> Self {
        Self::ExpenseRejected {
            expense: expense.into(),
            approver_id: approver_id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Public event name, as used in the webhook payload.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpenseSubmitted { .. } => "expense.submitted",
            Self::ExpenseApproved { .. } => "expense.approved",
            Self::ExpenseRejected { .. } => "expense.rejected",
        }
    }

    /// The company the event belongs to.
    pub fn company_id(&self) -> &str {
        match self {
            Self::ExpenseSubmitted { expense }
            | Self::ExpenseApproved { expense, .. }
            | Self::ExpenseRejected { expense, .. } => &expense.company_id,
        }
    }
}
