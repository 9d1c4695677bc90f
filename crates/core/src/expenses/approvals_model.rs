//! Approval audit records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expenses_model::{Expense, ExpenseStatus};
use crate::constants::AUTO_APPROVAL_COMMENT;
use crate::errors::Result;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approved,
    Rejected,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Approved => "approved",
            ApprovalAction::Rejected => "rejected",
        }
    }

    /// Expense status this decision moves the expense to.
    pub fn resulting_status(&self) -> ExpenseStatus {
        match self {
            ApprovalAction::Approved => ExpenseStatus::Approved,
            ApprovalAction::Rejected => ExpenseStatus::Rejected,
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(ApprovalAction::Approved),
            "rejected" => Ok(ApprovalAction::Rejected),
            other => Err(Error::invalid_input(format!(
                "Unknown approval action '{}'",
                other
            ))),
        }
    }
}

/// Append-only record of a decision taken on an expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: String,
    pub company_id: String,
    pub expense_id: String,
    pub approver_id: String,
    pub action: ApprovalAction,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Approval {
    /// Audit record for an expense the compliance check approved on submission.
    /// The submitter is recorded as the approver.
    pub fn automatic(expense: &Expense, at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id: expense.company_id.clone(),
            expense_id: expense.id.clone(),
            approver_id: expense.employee_id.clone(),
            action: ApprovalAction::Approved,
            comments: Some(AUTO_APPROVAL_COMMENT.to_string()),
            created_at: at,
        }
    }
}

/// A reviewer's decision, applied only while the expense is still open.
#[derive(Debug, Clone)]
pub struct ExpenseDecision {
    pub company_id: String,
    pub expense_id: String,
    pub approver_id: String,
    pub action: ApprovalAction,
    pub comments: Option<String>,
    pub decided_at: NaiveDateTime,
}

impl ExpenseDecision {
    pub fn approval_record(&self) -> Approval {
        Approval {
            id: Uuid::new_v4().to_string(),
            company_id: self.company_id.clone(),
            expense_id: self.expense_id.clone(),
            approver_id: self.approver_id.clone(),
            action: self.action,
            comments: self.comments.clone(),
            created_at: self.decided_at,
        }
    }

    /// Applies the decision to an in-memory expense.
    pub fn apply_to(&self, expense: &mut Expense) {
        expense.status = self.action.resulting_status();
        expense.updated_at = self.decided_at;
        match self.action {
            ApprovalAction::Approved => {
                expense.approved_by = Some(self.approver_id.clone());
                expense.approved_at = Some(self.decided_at);
            }
            ApprovalAction::Rejected => {
                expense.rejection_reason = self.comments.clone();
            }
        }
    }
}
