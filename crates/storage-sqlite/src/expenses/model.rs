//! Database models for expenses and approvals.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use spendwise_core::expenses::{
    Approval, ApprovalAction, Expense, ExpenseCategory, ExpenseStatus, Violation,
};

use crate::utils::{format_date, parse_date, parse_decimal, parse_enum};

/// Database model for expenses.
///
/// `amount` is a decimal string, `expense_date` is `YYYY-MM-DD` and
/// `violations` holds the JSON array produced by the compliance check.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ExpenseDB {
    pub id: String,
    pub company_id: String,
    pub employee_id: String,
    pub department: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub vendor: String,
    pub description: Option<String>,
    pub expense_date: String,
    pub receipt_url: Option<String>,
    pub status: String,
    pub violations: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ExpenseDB> for Expense {
    fn from(db: ExpenseDB) -> Self {
        let violations: Vec<Violation> =
            serde_json::from_str(&db.violations).unwrap_or_else(|e| {
                log::error!("Failed to parse violations of expense {}: {}", db.id, e);
                Vec::new()
            });
        Self {
            amount: parse_decimal(&db.amount, "amount"),
            category: parse_enum(&db.category, "category", ExpenseCategory::Other),
            expense_date: parse_date(&db.expense_date, "expense_date"),
            status: parse_enum(&db.status, "status", ExpenseStatus::Pending),
            violations,
            id: db.id,
            company_id: db.company_id,
            employee_id: db.employee_id,
            department: db.department,
            currency: db.currency,
            vendor: db.vendor,
            description: db.description,
            receipt_url: db.receipt_url,
            approved_by: db.approved_by,
            approved_at: db.approved_at,
            rejection_reason: db.rejection_reason,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TryFrom<Expense> for ExpenseDB {
    type Error = serde_json::Error;

    fn try_from(domain: Expense) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            violations: serde_json::to_string(&domain.violations)?,
            amount: domain.amount.to_string(),
            category: domain.category.as_str().to_string(),
            expense_date: format_date(domain.expense_date),
            status: domain.status.as_str().to_string(),
            id: domain.id,
            company_id: domain.company_id,
            employee_id: domain.employee_id,
            department: domain.department,
            currency: domain.currency,
            vendor: domain.vendor,
            description: domain.description,
            receipt_url: domain.receipt_url,
            approved_by: domain.approved_by,
            approved_at: domain.approved_at,
            rejection_reason: domain.rejection_reason,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}

/// Database model for the append-only approval trail.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::approvals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ApprovalDB {
    pub id: String,
    pub company_id: String,
    pub expense_id: String,
    pub approver_id: String,
    pub action: String,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<ApprovalDB> for Approval {
    fn from(db: ApprovalDB) -> Self {
        Self {
            action: parse_enum(&db.action, "action", ApprovalAction::Rejected),
            id: db.id,
            company_id: db.company_id,
            expense_id: db.expense_id,
            approver_id: db.approver_id,
            comments: db.comments,
            created_at: db.created_at,
        }
    }
}

impl From<Approval> for ApprovalDB {
    fn from(domain: Approval) -> Self {
        Self {
            id: domain.id,
            company_id: domain.company_id,
            expense_id: domain.expense_id,
            approver_id: domain.approver_id,
            action: domain.action.as_str().to_string(),
            comments: domain.comments,
            created_at: domain.created_at,
        }
    }
}
