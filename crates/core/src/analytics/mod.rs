//! Analytics module - role-specific dashboards over expenses, budgets and
//! vendors.

mod aggregations;
mod analytics_model;
mod analytics_service;


pub use aggregations::{
    compliance_stats, monthly_trend, percentage, spend_by_category, spend_by_department,
    summarize, top_spenders,
};
pub use analytics_model::{
    ChartPoint, ComplianceStats, Dashboard, EmployeeDashboard, ExecutiveDashboard,
    FinanceDashboard, ManagerDashboard, MonthlyPoint, SpendSummary, SpenderTotal,
};
pub use analytics_service::{AnalyticsService, AnalyticsServiceTrait};
