//! Vendor statistics models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::ChartPoint;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::expenses::{Expense, ExpenseCategory};

/// Aggregated approved spend with one vendor of one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub company_id: String,
    pub name: String,
    /// Category of the most recent approved expense
    pub category: Option<ExpenseCategory>,
    pub total_spent: Decimal,
    pub transaction_count: i32,
    pub average_transaction: Decimal,
    pub last_transaction_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Vendor {
    pub fn average(total_spent: Decimal, transaction_count: i32) -> Decimal {
        if transaction_count > 0 {
            (total_spent / Decimal::from(transaction_count)).round_dp(DISPLAY_DECIMAL_PRECISION)
        } else {
            Decimal::ZERO
        }
    }
}

/// Stats row written by the vendor repository, keyed by (company, name)
/// with the name compared ignoring ASCII case.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorStats {
    pub company_id: String,
    pub name: String,
    pub category: Option<ExpenseCategory>,
    pub total_spent: Decimal,
    pub transaction_count: i32,
    pub last_transaction_date: Option<NaiveDate>,
}

impl VendorStats {
    /// Folds a vendor's approved expenses into stats.
    pub fn from_expenses(company_id: &str, name: &str, expenses: &[Expense]) -> Self {
        let latest = expenses
            .iter()
            .max_by(|a, b| (a.expense_date, a.created_at).cmp(&(b.expense_date, b.created_at)));
        Self {
            company_id: company_id.to_string(),
            name: name.to_string(),
            category: latest.map(|e| e.category),
            total_spent: expenses.iter().map(|e| e.amount).sum(),
            transaction_count: i32::try_from(expenses.len()).unwrap_or(i32::MAX),
            last_transaction_date: latest.map(|e| e.expense_date),
        }
    }
}

/// Attempts to spend with a blacklisted vendor.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistAttempt {
    pub vendor: String,
    pub attempts: usize,
    pub amount: Decimal,
}

/// Vendor concentration overview for finance dashboards.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorAnalytics {
    pub vendor_count: usize,
    pub total_spent: Decimal,
    pub top_vendors: Vec<Vendor>,
    /// Share of total spend going to the top vendors, in percent
    pub top_vendor_share: Decimal,
    pub spend_by_category: Vec<ChartPoint>,
    pub blacklist_attempts: Vec<BlacklistAttempt>,
}
