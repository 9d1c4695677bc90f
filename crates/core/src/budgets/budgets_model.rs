//! Budget domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALERT_THRESHOLD, DISPLAY_DECIMAL_PRECISION};
use crate::errors::Result;
use crate::expenses::{Expense, ExpenseCategory, ExpenseFilter, ExpenseStatus};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Quarterly => "quarterly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    fn months(&self) -> u32 {
        match self {
            BudgetPeriod::Monthly => 1,
            BudgetPeriod::Quarterly => 3,
            BudgetPeriod::Yearly => 12,
        }
    }

    /// Last day (inclusive) of a period starting on `start`.
    pub fn end_for(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_months(Months::new(self.months()))
            .and_then(|next| next.pred_opt())
            .unwrap_or(start)
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "monthly" => Ok(BudgetPeriod::Monthly),
            "quarterly" => Ok(BudgetPeriod::Quarterly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(Error::invalid_input(format!(
                "Unknown budget period '{}'",
                other
            ))),
        }
    }
}

/// Domain model for a department budget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub company_id: String,
    pub department: String,
    /// `None` caps every category of the department
    pub category: Option<ExpenseCategory>,
    pub amount: Decimal,
    /// Sum of approved expenses inside the budget window
    pub spent: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Budget {
    /// Whether an approved `expense` counts against this budget.
    pub fn covers(&self, expense: &Expense) -> bool {
        expense.company_id == self.company_id
            && expense.status == ExpenseStatus::Approved
            && expense.department == self.department
            && self.category.map_or(true, |c| c == expense.category)
            && expense.expense_date >= self.start_date
            && expense.expense_date <= self.end_date
    }

    /// Query selecting the expenses that make up `spent`.
    pub fn spending_filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            status: Some(ExpenseStatus::Approved),
            category: self.category,
            department: Some(self.department.clone()),
            from: Some(self.start_date),
            to: Some(self.end_date),
            ..Default::default()
        }
    }

    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::compute(self.amount, self.spent, self.alert_threshold)
    }
}

/// Figures derived from a budget's cap and spend.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub remaining: Decimal,
    /// Spent as a percentage of the cap, rounded to two places
    pub utilization: Decimal,
    pub is_over_budget: bool,
    pub alert_triggered: bool,
}

impl BudgetStatus {
    pub fn compute(amount: Decimal, spent: Decimal, alert_threshold: i32) -> Self {
        let utilization = if amount > Decimal::ZERO {
            (spent / amount * Decimal::ONE_HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION)
        } else {
            Decimal::ZERO
        };
        Self {
            remaining: amount - spent,
            utilization,
            is_over_budget: spent > amount,
            alert_triggered: utilization >= Decimal::from(alert_threshold),
        }
    }
}

/// A budget with its derived status, as returned by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithStatus {
    #[serde(flatten)]
    pub budget: Budget,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

impl From<Budget> for BudgetWithStatus {
    fn from(budget: Budget) -> Self {
        let status = budget.status();
        Self { budget, status }
    }
}

/// Input model for creating a budget. `end_date` defaults to the end of the
/// first period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub department: String,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    pub amount: Decimal,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub alert_threshold: Option<i32>,
}

impl NewBudget {
    /// Validates the input and fills the derived defaults.
    pub fn normalized(mut self) -> Result<Self> {
        self.department = self.department.trim().to_string();
        if self.department.is_empty() {
            return Err(Error::missing_field("department"));
        }
        validate_cap(self.amount)?;
        let end_date = self
            .end_date
            .unwrap_or_else(|| self.period.end_for(self.start_date));
        validate_window(self.start_date, end_date)?;
        self.end_date = Some(end_date);
        let threshold = self.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
        validate_threshold(threshold)?;
        self.alert_threshold = Some(threshold);
        Ok(self)
    }
}

/// Input model for updating a budget. Department and category are fixed.
/// Moving the start or changing the period without an explicit end date
/// re-derives the end date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub amount: Option<Decimal>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub alert_threshold: Option<i32>,
}

impl BudgetUpdate {
    /// Returns true when the update changes which expenses the budget covers.
    pub fn moves_window(&self) -> bool {
        self.period.is_some() || self.start_date.is_some() || self.end_date.is_some()
    }

    pub fn apply_to(self, budget: &mut Budget) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_cap(amount)?;
            budget.amount = amount;
        }
        if let Some(threshold) = self.alert_threshold {
            validate_threshold(threshold)?;
            budget.alert_threshold = threshold;
        }
        let rederive_end = self.end_date.is_none()
            && (self.period.is_some() || self.start_date.is_some());
        if let Some(period) = self.period {
            budget.period = period;
        }
        if let Some(start_date) = self.start_date {
            budget.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            budget.end_date = end_date;
        } else if rederive_end {
            budget.end_date = budget.period.end_for(budget.start_date);
        }
        validate_window(budget.start_date, budget.end_date)
    }
}

fn validate_cap(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input("Budget amount must be greater than zero"));
    }
    Ok(())
}

fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::invalid_input(
            "Budget end date cannot be before its start date",
        ));
    }
    Ok(())
}

fn validate_threshold(threshold: i32) -> Result<()> {
    if !(1..=100).contains(&threshold) {
        return Err(Error::invalid_input(
            "Alert threshold must be between 1 and 100",
        ));
    }
    Ok(())
}
