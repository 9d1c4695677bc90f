//! In-memory repositories and fixtures shared by the service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::budgets::{Budget, BudgetRepositoryTrait, BudgetService, NewBudget};
use crate::companies::{Company, CompanyRepositoryTrait, CompanyUpdate, NewCompany};
use crate::errors::Result;
use crate::events::MockDomainEventSink;
use crate::expenses::{
    Approval, Expense, ExpenseDecision, ExpenseFilter, ExpenseRepositoryTrait, ExpenseService,
};
use crate::policies::{NewPolicy, Policy, PolicyRepositoryTrait, PolicyService};
use crate::users::{Actor, NewUser, Role, User, UserRepositoryTrait, UserRoleUpdate};
use crate::vendors::{Vendor, VendorRepositoryTrait, VendorService, VendorStats};
use crate::Error;

pub const COMPANY_ID: &str = "company-1";
pub const OTHER_COMPANY_ID: &str = "company-2";

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn actor(user_id: &str, role: Role, department: &str) -> Actor {
    Actor {
        user_id: user_id.to_string(),
        company_id: COMPANY_ID.to_string(),
        role,
        department: department.to_string(),
    }
}

pub fn user_from(actor: &Actor, name: &str) -> User {
    User {
        id: actor.user_id.clone(),
        company_id: actor.company_id.clone(),
        name: name.to_string(),
        email: format!("{}@example.com", actor.user_id),
        password_hash: "hash".to_string(),
        role: actor.role,
        department: actor.department.clone(),
        manager_id: None,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

// --- Companies ---
#[derive(Clone, Default)]
pub struct InMemoryCompanies {
    pub companies: Arc<Mutex<Vec<Company>>>,
}

impl InMemoryCompanies {
    pub fn with_defaults() -> Self {
        let repo = Self::default();
        for (id, name) in [(COMPANY_ID, "Acme"), (OTHER_COMPANY_ID, "Globex")] {
            repo.companies.lock().unwrap().push(Company {
                id: id.to_string(),
                name: name.to_string(),
                currency: "USD".to_string(),
                created_at: now(),
                updated_at: now(),
            });
        }
        repo
    }
}

#[async_trait]
impl CompanyRepositoryTrait for InMemoryCompanies {
    fn get_by_id(&self, company_id: &str) -> Result<Company> {
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == company_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Company".to_string()))
    }

    async fn create(&self, new_company: NewCompany) -> Result<Company> {
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: new_company.name,
            currency: new_company.currency,
            created_at: now(),
            updated_at: now(),
        };
        self.companies.lock().unwrap().push(company.clone());
        Ok(company)
    }

    async fn update(&self, company_id: &str, update: CompanyUpdate) -> Result<Company> {
        let mut companies = self.companies.lock().unwrap();
        let company = companies
            .iter_mut()
            .find(|c| c.id == company_id)
            .ok_or_else(|| Error::NotFound("Company".to_string()))?;
        if let Some(name) = update.name {
            company.name = name;
        }
        if let Some(currency) = update.currency {
            company.currency = currency;
        }
        Ok(company.clone())
    }
}

// --- Users ---
#[derive(Clone, Default)]
pub struct InMemoryUsers {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUsers {
    pub fn add(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUsers {
    fn get_by_id(&self, company_id: &str, user_id: &str) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.company_id == company_id && u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    fn list(&self, company_id: &str, department: Option<&str>) -> Result<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.company_id == company_id)
            .filter(|u| department.map_or(true, |d| u.department == d))
            .cloned()
            .collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            company_id: new_user.company_id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            department: new_user.department,
            manager_id: new_user.manager_id,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        };
        self.add(user.clone());
        Ok(user)
    }

    async fn update_role(
        &self,
        company_id: &str,
        user_id: &str,
        update: UserRoleUpdate,
    ) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.company_id == company_id && u.id == user_id)
            .ok_or_else(|| Error::NotFound("User".to_string()))?;
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(department) = update.department {
            user.department = department;
        }
        if let Some(manager_id) = update.manager_id {
            user.manager_id = Some(manager_id);
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        Ok(user.clone())
    }
}

// --- Policies ---
#[derive(Clone, Default)]
pub struct InMemoryPolicies {
    pub policies: Arc<Mutex<Vec<Policy>>>,
}

#[async_trait]
impl PolicyRepositoryTrait for InMemoryPolicies {
    fn list(&self, company_id: &str) -> Result<Vec<Policy>> {
        Ok(self
            .policies
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, company_id: &str, policy_id: &str) -> Result<Policy> {
        self.list(company_id)?
            .into_iter()
            .find(|p| p.id == policy_id)
            .ok_or_else(|| Error::NotFound("Policy".to_string()))
    }

    fn find_by_department(&self, company_id: &str, department: &str) -> Result<Option<Policy>> {
        Ok(self
            .list(company_id)?
            .into_iter()
            .find(|p| p.department == department))
    }

    async fn create(&self, company_id: &str, new_policy: NewPolicy) -> Result<Policy> {
        let policy = Policy {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            department: new_policy.department,
            meal_limit_per_day: new_policy.meal_limit_per_day,
            hotel_limit_per_night: new_policy.hotel_limit_per_night,
            receipt_required_over: new_policy.receipt_required_over,
            auto_approve_limit: new_policy.auto_approve_limit,
            blacklisted_vendors: new_policy.blacklisted_vendors,
            is_active: new_policy.is_active,
            created_at: now(),
            updated_at: now(),
        };
        self.policies.lock().unwrap().push(policy.clone());
        Ok(policy)
    }

    async fn update(&self, policy: Policy) -> Result<Policy> {
        let mut policies = self.policies.lock().unwrap();
        let existing = policies
            .iter_mut()
            .find(|p| p.company_id == policy.company_id && p.id == policy.id)
            .ok_or_else(|| Error::NotFound("Policy".to_string()))?;
        *existing = policy.clone();
        Ok(policy)
    }

    async fn delete(&self, company_id: &str, policy_id: &str) -> Result<usize> {
        let mut policies = self.policies.lock().unwrap();
        let before = policies.len();
        policies.retain(|p| !(p.company_id == company_id && p.id == policy_id));
        Ok(before - policies.len())
    }
}

// --- Expenses ---
#[derive(Clone, Default)]
pub struct InMemoryExpenses {
    pub expenses: Arc<Mutex<Vec<Expense>>>,
    pub approvals: Arc<Mutex<Vec<Approval>>>,
}

impl InMemoryExpenses {
    pub fn add(&self, expense: Expense) {
        self.expenses.lock().unwrap().push(expense);
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.lock().unwrap().len()
    }

    /// Flips a stored expense behind the service's back, as a concurrent
    /// reviewer would.
    pub fn force_status(&self, expense_id: &str, status: crate::expenses::ExpenseStatus) {
        let mut expenses = self.expenses.lock().unwrap();
        if let Some(expense) = expenses.iter_mut().find(|e| e.id == expense_id) {
            expense.status = status;
        }
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for InMemoryExpenses {
    fn get_by_id(&self, company_id: &str, expense_id: &str) -> Result<Expense> {
        self.expenses
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.company_id == company_id && e.id == expense_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Expense".to_string()))
    }

    fn list(&self, company_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.company_id == company_id && filter.matches(e))
            .cloned()
            .collect())
    }

    fn list_approvals(&self, company_id: &str, expense_id: &str) -> Result<Vec<Approval>> {
        Ok(self
            .approvals
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.company_id == company_id && a.expense_id == expense_id)
            .cloned()
            .collect())
    }

    async fn create(&self, expense: Expense, approval: Option<Approval>) -> Result<Expense> {
        self.add(expense.clone());
        if let Some(approval) = approval {
            self.approvals.lock().unwrap().push(approval);
        }
        Ok(expense)
    }

    async fn update_open(
        &self,
        expense: Expense,
        approval: Option<Approval>,
    ) -> Result<Option<Expense>> {
        let mut expenses = self.expenses.lock().unwrap();
        let Some(existing) = expenses.iter_mut().find(|e| {
            e.company_id == expense.company_id && e.id == expense.id && e.status.is_open()
        }) else {
            return Ok(None);
        };
        *existing = expense.clone();
        if let Some(approval) = approval {
            self.approvals.lock().unwrap().push(approval);
        }
        Ok(Some(expense))
    }

    async fn record_decision(
        &self,
        decision: ExpenseDecision,
    ) -> Result<Option<(Expense, Approval)>> {
        let mut expenses = self.expenses.lock().unwrap();
        let Some(existing) = expenses.iter_mut().find(|e| {
            e.company_id == decision.company_id && e.id == decision.expense_id && e.status.is_open()
        }) else {
            return Ok(None);
        };
        decision.apply_to(existing);
        let approval = decision.approval_record();
        self.approvals.lock().unwrap().push(approval.clone());
        Ok(Some((existing.clone(), approval)))
    }

    async fn delete_open(&self, company_id: &str, expense_id: &str) -> Result<usize> {
        let mut expenses = self.expenses.lock().unwrap();
        let before = expenses.len();
        expenses.retain(|e| !(e.company_id == company_id && e.id == expense_id && e.status.is_open()));
        Ok(before - expenses.len())
    }
}

// --- Budgets ---
#[derive(Clone, Default)]
pub struct InMemoryBudgets {
    pub budgets: Arc<Mutex<Vec<Budget>>>,
    pub expenses: InMemoryExpenses,
}

impl InMemoryBudgets {
    pub fn get(&self, budget_id: &str) -> Budget {
        self.budgets
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == budget_id)
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl BudgetRepositoryTrait for InMemoryBudgets {
    fn list(&self, company_id: &str, department: Option<&str>) -> Result<Vec<Budget>> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.company_id == company_id)
            .filter(|b| department.map_or(true, |d| b.department == d))
            .cloned()
            .collect())
    }

    fn get_by_id(&self, company_id: &str, budget_id: &str) -> Result<Budget> {
        self.list(company_id, None)?
            .into_iter()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| Error::NotFound("Budget".to_string()))
    }

    async fn create(&self, company_id: &str, new_budget: NewBudget) -> Result<Budget> {
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            department: new_budget.department,
            category: new_budget.category,
            amount: new_budget.amount,
            spent: Decimal::ZERO,
            period: new_budget.period,
            start_date: new_budget.start_date,
            end_date: new_budget
                .end_date
                .unwrap_or_else(|| new_budget.period.end_for(new_budget.start_date)),
            alert_threshold: new_budget.alert_threshold.unwrap_or(80),
            created_at: now(),
            updated_at: now(),
        };
        self.budgets.lock().unwrap().push(budget.clone());
        Ok(budget)
    }

    async fn update(&self, budget: Budget) -> Result<Budget> {
        let mut budgets = self.budgets.lock().unwrap();
        let existing = budgets
            .iter_mut()
            .find(|b| b.company_id == budget.company_id && b.id == budget.id)
            .ok_or_else(|| Error::NotFound("Budget".to_string()))?;
        *existing = budget.clone();
        Ok(budget)
    }

    async fn recompute_spent(&self, company_id: &str, budget_id: &str) -> Result<Budget> {
        let mut budgets = self.budgets.lock().unwrap();
        let existing = budgets
            .iter_mut()
            .find(|b| b.company_id == company_id && b.id == budget_id)
            .ok_or_else(|| Error::NotFound("Budget".to_string()))?;
        existing.spent = self
            .expenses
            .list(company_id, &existing.spending_filter())?
            .iter()
            .map(|e| e.amount)
            .sum();
        Ok(existing.clone())
    }

    async fn delete(&self, company_id: &str, budget_id: &str) -> Result<usize> {
        let mut budgets = self.budgets.lock().unwrap();
        let before = budgets.len();
        budgets.retain(|b| !(b.company_id == company_id && b.id == budget_id));
        Ok(before - budgets.len())
    }
}

// --- Vendors ---
#[derive(Clone, Default)]
pub struct InMemoryVendors {
    pub vendors: Arc<Mutex<Vec<Vendor>>>,
    pub expenses: InMemoryExpenses,
}

#[async_trait]
impl VendorRepositoryTrait for InMemoryVendors {
    fn list(&self, company_id: &str) -> Result<Vec<Vendor>> {
        Ok(self
            .vendors
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn refresh(&self, company_id: &str, vendor: &str) -> Result<Vendor> {
        let vendor = vendor.trim();
        let filter = ExpenseFilter {
            vendor: Some(vendor.to_string()),
            ..ExpenseFilter::approved()
        };
        let stats =
            VendorStats::from_expenses(company_id, vendor, &self.expenses.list(company_id, &filter)?);
        let mut vendors = self.vendors.lock().unwrap();
        let refreshed = Vendor {
            id: Uuid::new_v4().to_string(),
            company_id: stats.company_id.clone(),
            name: stats.name.clone(),
            category: stats.category,
            total_spent: stats.total_spent,
            transaction_count: stats.transaction_count,
            average_transaction: Vendor::average(stats.total_spent, stats.transaction_count),
            last_transaction_date: stats.last_transaction_date,
            created_at: now(),
            updated_at: now(),
        };
        match vendors
            .iter_mut()
            .find(|v| v.company_id == company_id && v.name.eq_ignore_ascii_case(vendor))
        {
            Some(existing) => {
                *existing = Vendor {
                    id: existing.id.clone(),
                    name: existing.name.clone(),
                    ..refreshed
                };
                Ok(existing.clone())
            }
            None => {
                vendors.push(refreshed.clone());
                Ok(refreshed)
            }
        }
    }
}

/// Every repository and service wired together in memory.
pub struct Fixture {
    pub companies: Arc<InMemoryCompanies>,
    pub users: Arc<InMemoryUsers>,
    pub policies: Arc<InMemoryPolicies>,
    pub expenses: Arc<InMemoryExpenses>,
    pub budgets: Arc<InMemoryBudgets>,
    pub vendors: Arc<InMemoryVendors>,
    pub sink: MockDomainEventSink,
    pub policy_service: Arc<PolicyService>,
    pub budget_service: Arc<BudgetService>,
    pub vendor_service: Arc<VendorService>,
    pub expense_service: Arc<ExpenseService>,
}

impl Fixture {
    pub fn new() -> Self {
        let companies = Arc::new(InMemoryCompanies::with_defaults());
        let users = Arc::new(InMemoryUsers::default());
        let policies = Arc::new(InMemoryPolicies::default());
        let expenses = Arc::new(InMemoryExpenses::default());
        let budgets = Arc::new(InMemoryBudgets {
            expenses: (*expenses).clone(),
            ..Default::default()
        });
        let vendors = Arc::new(InMemoryVendors {
            expenses: (*expenses).clone(),
            ..Default::default()
        });
        let sink = MockDomainEventSink::new();

        let policy_service = Arc::new(PolicyService::new(policies.clone()));
        let budget_service = Arc::new(BudgetService::new(budgets.clone()));
        let vendor_service = Arc::new(VendorService::new(vendors.clone(), expenses.clone()));
        let expense_service = Arc::new(ExpenseService::new(
            expenses.clone(),
            companies.clone(),
            policy_service.clone(),
            budget_service.clone(),
            vendor_service.clone(),
            Arc::new(sink.clone()),
        ));

        Self {
            companies,
            users,
            policies,
            expenses,
            budgets,
            vendors,
            sink,
            policy_service,
            budget_service,
            vendor_service,
            expense_service,
        }
    }

    /// Registers `actor` as a user of the default company.
    pub fn add_user(&self, actor: &Actor, name: &str) {
        self.users.add(user_from(actor, name));
    }
}
