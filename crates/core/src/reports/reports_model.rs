//! Report export models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::expenses::Expense;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(Error::invalid_input(format!(
                "Unsupported report format '{}'",
                other
            ))),
        }
    }
}

/// A rendered export, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One printable line of the expense report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseReportRow {
    pub date: NaiveDate,
    pub employee: String,
    pub department: String,
    pub category: String,
    pub vendor: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub violations: Vec<String>,
}

impl ExpenseReportRow {
    pub fn from_expense(expense: &Expense, employee: &str) -> Self {
        Self {
            date: expense.expense_date,
            employee: employee.to_string(),
            department: expense.department.clone(),
            category: expense.category.as_str().to_string(),
            vendor: expense.vendor.clone(),
            description: expense.description.clone().unwrap_or_default(),
            amount: expense.amount,
            currency: expense.currency.clone(),
            status: expense.status.as_str().to_string(),
            violations: expense.violations.iter().map(|v| v.rule.clone()).collect(),
        }
    }
}

/// Header information printed on PDF reports.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub company_name: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub generated_at: NaiveDateTime,
}

impl ReportHeader {
    pub fn period_label(&self) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!("{} to {}", from, to),
            (Some(from), None) => format!("From {}", from),
            (None, Some(to)) => format!("Up to {}", to),
            (None, None) => "All dates".to_string(),
        }
    }
}
