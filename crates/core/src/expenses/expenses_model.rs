//! Expense domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::companies::Company;
use crate::errors::Result;
use crate::users::Actor;
use crate::Error;

/// Spending category of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Travel,
    Meals,
    Accommodation,
    Transportation,
    #[serde(rename = "Office Supplies", alias = "OfficeSupplies")]
    OfficeSupplies,
    Software,
    Training,
    Entertainment,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Travel,
        ExpenseCategory::Meals,
        ExpenseCategory::Accommodation,
        ExpenseCategory::Transportation,
        ExpenseCategory::OfficeSupplies,
        ExpenseCategory::Software,
        ExpenseCategory::Training,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Meals => "Meals",
            ExpenseCategory::Accommodation => "Accommodation",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::OfficeSupplies => "Office Supplies",
            ExpenseCategory::Software => "Software",
            ExpenseCategory::Training => "Training",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(wanted)
                    || c.as_str().replace(' ', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| Error::invalid_input(format!("Unknown expense category '{}'", s)))
    }
}

/// Lifecycle state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Flagged,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    /// States from which an expense can still be edited, deleted or decided.
    pub const OPEN: [ExpenseStatus; 2] = [ExpenseStatus::Pending, ExpenseStatus::Flagged];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Flagged => "flagged",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
        }
    }

    pub fn is_open(&self) -> bool {
        Self::OPEN.contains(self)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ExpenseStatus::Pending),
            "flagged" => Ok(ExpenseStatus::Flagged),
            "approved" => Ok(ExpenseStatus::Approved),
            "rejected" => Ok(ExpenseStatus::Rejected),
            other => Err(Error::invalid_input(format!(
                "Unknown expense status '{}'",
                other
            ))),
        }
    }
}

/// Severity label of a policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A recorded reason an expense failed a policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule: String,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    pub fn new(rule: &str, message: String, severity: Severity) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            severity,
        }
    }
}

/// Domain model for an expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub company_id: String,
    pub employee_id: String,
    /// Submitter's department at submission time
    pub department: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: ExpenseCategory,
    pub vendor: String,
    pub description: Option<String>,
    pub expense_date: NaiveDate,
    pub receipt_url: Option<String>,
    pub status: ExpenseStatus,
    pub violations: Vec<Violation>,
    pub approved_by: Option<String>,
    pub approved_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Expense {
    /// Whether `actor` may see this expense. The company boundary is enforced
    /// by the repositories; this checks the role scope inside the company.
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        if self.company_id != actor.company_id {
            return false;
        }
        if self.employee_id == actor.user_id || actor.role.sees_whole_company() {
            return true;
        }
        actor.role.is_reviewer() && self.department == actor.department
    }
}

/// Input model for submitting an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    pub category: ExpenseCategory,
    pub vendor: String,
    #[serde(default)]
    pub description: Option<String>,
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl NewExpense {
    /// Validates and trims the input; the company currency fills a missing
    /// currency.
    pub fn normalized(mut self, company: &Company) -> Result<Self> {
        validate_amount(self.amount)?;
        self.vendor = required_trimmed(&self.vendor, "vendor")?;
        self.description = optional_trimmed(self.description);
        self.receipt_url = optional_trimmed(self.receipt_url);
        self.currency = Some(match optional_trimmed(self.currency) {
            Some(currency) => normalize_currency(&currency)?,
            None => company.currency.clone(),
        });
        Ok(self)
    }
}

/// Input model for editing an open expense. An empty `receiptUrl` clears
/// the receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

impl ExpenseUpdate {
    /// Applies the update on top of `expense`, validating the changed fields.
    pub fn apply_to(self, expense: &mut Expense) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
            expense.amount = amount;
        }
        if let Some(currency) = self.currency {
            expense.currency = normalize_currency(&currency)?;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(vendor) = self.vendor {
            expense.vendor = required_trimmed(&vendor, "vendor")?;
        }
        if let Some(description) = self.description {
            expense.description = optional_trimmed(Some(description));
        }
        if let Some(expense_date) = self.expense_date {
            expense.expense_date = expense_date;
        }
        if let Some(receipt_url) = self.receipt_url {
            expense.receipt_url = optional_trimmed(Some(receipt_url));
        }
        Ok(())
    }
}

/// Filters for listing expenses. Dates are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    pub status: Option<ExpenseStatus>,
    pub category: Option<ExpenseCategory>,
    pub department: Option<String>,
    pub employee_id: Option<String>,
    /// Matched ignoring surrounding whitespace and ASCII case.
    pub vendor: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn approved() -> Self {
        Self {
            status: Some(ExpenseStatus::Approved),
            ..Default::default()
        }
    }

    /// Narrows the filter to what `actor` is allowed to see.
    pub fn scoped_to(mut self, actor: &Actor) -> Self {
        if !actor.role.is_reviewer() && !actor.role.sees_whole_company() {
            self.employee_id = Some(actor.user_id.clone());
        } else if let Some(department) = actor.department_scope() {
            self.department = Some(department.to_string());
        }
        self
    }

    /// In-memory equivalent of the repository query.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.status.map_or(true, |s| expense.status == s)
            && self.category.map_or(true, |c| expense.category == c)
            && self
                .department
                .as_deref()
                .map_or(true, |d| expense.department == d)
            && self
                .employee_id
                .as_deref()
                .map_or(true, |e| expense.employee_id == e)
            && self
                .vendor
                .as_deref()
                .map_or(true, |v| expense.vendor.eq_ignore_ascii_case(v.trim()))
            && self.from.map_or(true, |from| expense.expense_date >= from)
            && self.to.map_or(true, |to| expense.expense_date <= to)
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input("Expense amount must be greater than zero"));
    }
    Ok(())
}

fn required_trimmed(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(trimmed.to_string())
}

fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_currency(currency: &str) -> Result<String> {
    let currency = currency.trim().to_uppercase();
    crate::companies::validate_currency(&currency)?;
    Ok(currency)
}
