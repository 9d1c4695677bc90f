use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::aggregations::{
    compliance_stats, monthly_trend, percentage, spend_by_category, spend_by_department,
    summarize, top_spenders,
};
use super::analytics_model::{
    Dashboard, EmployeeDashboard, ExecutiveDashboard, FinanceDashboard, ManagerDashboard,
};
use crate::budgets::BudgetServiceTrait;
use crate::constants::{RECENT_EXPENSES, TOP_N, TREND_MONTHS};
use crate::errors::Result;
use crate::expenses::{Expense, ExpenseFilter, ExpenseRepositoryTrait};
use crate::users::{Actor, Role, UserRepositoryTrait};
use crate::vendors::VendorServiceTrait;

/// Trait for dashboard queries
pub trait AnalyticsServiceTrait: Send + Sync {
    fn dashboard(&self, actor: &Actor) -> Result<Dashboard>;
    fn dashboard_as_of(&self, actor: &Actor, today: NaiveDate) -> Result<Dashboard>;
}

/// Builds the role-specific dashboards from expenses, budgets and vendors.
pub struct AnalyticsService {
    expense_repository: Arc<dyn ExpenseRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    budget_service: Arc<dyn BudgetServiceTrait>,
    vendor_service: Arc<dyn VendorServiceTrait>,
}

impl AnalyticsService {
    pub fn new(
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        budget_service: Arc<dyn BudgetServiceTrait>,
        vendor_service: Arc<dyn VendorServiceTrait>,
    ) -> Self {
        Self {
            expense_repository,
            user_repository,
            budget_service,
            vendor_service,
        }
    }

    fn expenses(&self, actor: &Actor) -> Result<Vec<Expense>> {
        let filter = ExpenseFilter::default().scoped_to(actor);
        self.expense_repository.list(&actor.company_id, &filter)
    }

    fn employee(&self, actor: &Actor, today: NaiveDate) -> Result<EmployeeDashboard> {
        let mut expenses = self.expenses(actor)?;
        let summary = summarize(&expenses);
        let spend_by_category = spend_by_category(&expenses);
        let monthly_trend = monthly_trend(&expenses, today, TREND_MONTHS);
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        expenses.truncate(RECENT_EXPENSES);
        Ok(EmployeeDashboard {
            summary,
            spend_by_category,
            monthly_trend,
            recent_expenses: expenses,
        })
    }

    fn manager(&self, actor: &Actor) -> Result<ManagerDashboard> {
        let expenses = self.expenses(actor)?;
        let users = self
            .user_repository
            .list(&actor.company_id, Some(&actor.department))?;
        let mut awaiting_review: Vec<Expense> = expenses
            .iter()
            .filter(|e| e.status.is_open() && e.employee_id != actor.user_id)
            .cloned()
            .collect();
        awaiting_review.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(ManagerDashboard {
            department: actor.department.clone(),
            summary: summarize(&expenses),
            awaiting_review,
            spend_by_category: spend_by_category(&expenses),
            top_spenders: top_spenders(&expenses, &users, TOP_N),
            budgets: self.budget_service.list_budgets(actor)?,
            compliance: compliance_stats(&expenses),
        })
    }

    fn finance(&self, actor: &Actor, today: NaiveDate) -> Result<FinanceDashboard> {
        let expenses = self.expenses(actor)?;
        let budgets = self.budget_service.list_budgets(actor)?;
        let budget_alerts = budgets
            .iter()
            .filter(|b| b.status.alert_triggered)
            .cloned()
            .collect();
        let mut top_vendors = self.vendor_service.list_vendors(actor)?;
        top_vendors.truncate(TOP_N);

        Ok(FinanceDashboard {
            summary: summarize(&expenses),
            spend_by_department: spend_by_department(&expenses),
            spend_by_category: spend_by_category(&expenses),
            monthly_trend: monthly_trend(&expenses, today, TREND_MONTHS),
            budgets,
            budget_alerts,
            compliance: compliance_stats(&expenses),
            top_vendors,
        })
    }

    fn executive(&self, actor: &Actor, today: NaiveDate) -> Result<ExecutiveDashboard> {
        let expenses = self.expenses(actor)?;
        let budgets = self.budget_service.list_budgets(actor)?;
        let total_budget: Decimal = budgets.iter().map(|b| b.budget.amount).sum();
        let total_budget_spent: Decimal = budgets.iter().map(|b| b.budget.spent).sum();
        let mut top_vendors = self.vendor_service.list_vendors(actor)?;
        top_vendors.truncate(TOP_N);

        Ok(ExecutiveDashboard {
            summary: summarize(&expenses),
            spend_by_department: spend_by_department(&expenses),
            monthly_trend: monthly_trend(&expenses, today, TREND_MONTHS),
            total_budget,
            total_budget_spent,
            budget_utilization: percentage(total_budget_spent, total_budget),
            over_budget_count: budgets.iter().filter(|b| b.status.is_over_budget).count(),
            compliance: compliance_stats(&expenses),
            top_vendors,
        })
    }
}

impl AnalyticsServiceTrait for AnalyticsService {
    fn dashboard(&self, actor: &Actor) -> Result<Dashboard> {
        self.dashboard_as_of(actor, Utc::now().date_naive())
    }

    fn dashboard_as_of(&self, actor: &Actor, today: NaiveDate) -> Result<Dashboard> {
        debug!("Building {} dashboard for {}", actor.role, actor.user_id);
        Ok(match actor.role {
            Role::Employee => Dashboard::Employee(self.employee(actor, today)?),
            Role::Manager => Dashboard::Manager(self.manager(actor)?),
            Role::Finance | Role::Admin => Dashboard::Finance(self.finance(actor, today)?),
            Role::Executive => Dashboard::Executive(self.executive(actor, today)?),
        })
    }
}
