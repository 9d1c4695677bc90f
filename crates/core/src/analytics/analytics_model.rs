//! Dashboard view models.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::budgets::BudgetWithStatus;
use crate::expenses::Expense;
use crate::vendors::Vendor;

/// One labelled bar or slice of a chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
    pub count: usize,
}

/// Approved spend for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub value: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpendSummary {
    pub expense_count: usize,
    pub approved_total: Decimal,
    pub pending_total: Decimal,
    pub average_expense: Decimal,
    pub pending_count: usize,
    pub flagged_count: usize,
    pub approved_count: usize,
    pub rejected_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStats {
    pub expense_count: usize,
    pub with_violations: usize,
    /// Share of expenses without any violation, in percent
    pub compliance_rate: Decimal,
    pub violations_by_rule: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpenderTotal {
    pub employee_id: String,
    pub name: String,
    pub value: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub summary: SpendSummary,
    pub spend_by_category: Vec<ChartPoint>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub recent_expenses: Vec<Expense>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagerDashboard {
    pub department: String,
    pub summary: SpendSummary,
    pub awaiting_review: Vec<Expense>,
    pub spend_by_category: Vec<ChartPoint>,
    pub top_spenders: Vec<SpenderTotal>,
    pub budgets: Vec<BudgetWithStatus>,
    pub compliance: ComplianceStats,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceDashboard {
    pub summary: SpendSummary,
    pub spend_by_department: Vec<ChartPoint>,
    pub spend_by_category: Vec<ChartPoint>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub budgets: Vec<BudgetWithStatus>,
    pub budget_alerts: Vec<BudgetWithStatus>,
    pub compliance: ComplianceStats,
    pub top_vendors: Vec<Vendor>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveDashboard {
    pub summary: SpendSummary,
    pub spend_by_department: Vec<ChartPoint>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub total_budget: Decimal,
    pub total_budget_spent: Decimal,
    pub budget_utilization: Decimal,
    pub over_budget_count: usize,
    pub compliance: ComplianceStats,
    pub top_vendors: Vec<Vendor>,
}

/// Role-specific dashboard, tagged with the view it was built for.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Dashboard {
    Employee(EmployeeDashboard),
    Manager(ManagerDashboard),
    Finance(FinanceDashboard),
    Executive(ExecutiveDashboard),
}
