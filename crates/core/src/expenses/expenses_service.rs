use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use super::approvals_model::{Approval, ApprovalAction, ExpenseDecision};
use super::expenses_model::{Expense, ExpenseFilter, ExpenseStatus, ExpenseUpdate, NewExpense};
use super::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
use crate::budgets::BudgetServiceTrait;
use crate::companies::CompanyRepositoryTrait;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::policies::{evaluate, ComplianceInput, ComplianceOutcome, PolicyServiceTrait};
use crate::users::{Actor, Role};
use crate::vendors::VendorServiceTrait;
use crate::Error;

/// Service for the expense lifecycle: submission, edits and review.
pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepositoryTrait>,
    company_repository: Arc<dyn CompanyRepositoryTrait>,
    policy_service: Arc<dyn PolicyServiceTrait>,
    budget_service: Arc<dyn BudgetServiceTrait>,
    vendor_service: Arc<dyn VendorServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl ExpenseService {
    pub fn new(
        repository: Arc<dyn ExpenseRepositoryTrait>,
        company_repository: Arc<dyn CompanyRepositoryTrait>,
        policy_service: Arc<dyn PolicyServiceTrait>,
        budget_service: Arc<dyn BudgetServiceTrait>,
        vendor_service: Arc<dyn VendorServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            company_repository,
            policy_service,
            budget_service,
            vendor_service,
            event_sink,
        }
    }

    fn check_compliance(&self, expense: &Expense) -> Result<ComplianceOutcome> {
        let policy = self
            .policy_service
            .policy_for_department(&expense.company_id, &expense.department)?;
        let input = ComplianceInput {
            amount: expense.amount,
            category: expense.category,
            vendor: &expense.vendor,
            receipt_url: expense.receipt_url.as_deref(),
        };
        Ok(evaluate(&input, policy.as_ref()))
    }

    /// Stamps the compliance outcome on the expense and returns the audit
    /// record when the outcome is an automatic approval.
    fn apply_outcome(expense: &mut Expense, outcome: ComplianceOutcome) -> Option<Approval> {
        let auto_approved = outcome.is_auto_approved();
        expense.status = outcome.status;
        expense.violations = outcome.violations;
        if auto_approved {
            expense.approved_by = Some(expense.employee_id.clone());
            expense.approved_at = Some(expense.updated_at);
            Some(Approval::automatic(expense, expense.updated_at))
        } else {
            expense.approved_by = None;
            expense.approved_at = None;
            None
        }
    }

    /// Loads an expense the actor is allowed to see.
    fn visible_expense(&self, actor: &Actor, expense_id: &str) -> Result<Expense> {
        let expense = self.repository.get_by_id(&actor.company_id, expense_id)?;
        if !expense.is_visible_to(actor) {
            return Err(Error::PermissionDenied(
                "expense is outside your visibility scope".to_string(),
            ));
        }
        Ok(expense)
    }

    /// Rolls an approval into the derived budget and vendor figures. The
    /// approval itself is already committed, so failures are only logged.
    async fn after_approval(&self, expense: &Expense) {
        if let Err(e) = self.budget_service.apply_approved_expense(expense).await {
            warn!(
                "Failed to update budgets for approved expense {}: {}",
                expense.id, e
            );
        }
        if let Err(e) = self
            .vendor_service
            .refresh_vendor(&expense.company_id, &expense.vendor)
            .await
        {
            warn!(
                "Failed to refresh vendor '{}' for expense {}: {}",
                expense.vendor, expense.id, e
            );
        }
    }

    async fn decide(
        &self,
        actor: &Actor,
        expense_id: &str,
        action: ApprovalAction,
        comments: Option<String>,
    ) -> Result<Expense> {
        actor.require(&Role::REVIEWERS, "review expenses")?;
        let expense = self.visible_expense(actor, expense_id)?;
        if expense.employee_id == actor.user_id {
            return Err(Error::PermissionDenied(
                "reviewers cannot decide on their own expenses".to_string(),
            ));
        }
        if !expense.status.is_open() {
            return Err(Error::Conflict(format!(
                "Expense {} is already {}",
                expense.id, expense.status
            )));
        }

        let decision = ExpenseDecision {
            company_id: actor.company_id.clone(),
            expense_id: expense.id.clone(),
            approver_id: actor.user_id.clone(),
            action,
            comments,
            decided_at: Utc::now().naive_utc(),
        };
        let Some((decided, _approval)) = self.repository.record_decision(decision).await? else {
            return Err(Error::Conflict(format!(
                "Expense {} was decided by another reviewer",
                expense_id
            )));
        };
        info!(
            "Expense {} {} by {}",
            decided.id, decided.status, actor.user_id
        );
        Ok(decided)
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    async fn submit_expense(&self, actor: &Actor, new_expense: NewExpense) -> Result<Expense> {
        let company = self.company_repository.get_by_id(&actor.company_id)?;
        let new_expense = new_expense.normalized(&company)?;
        let now = Utc::now().naive_utc();

        let mut expense = Expense {
            id: Uuid::new_v4().to_string(),
            company_id: actor.company_id.clone(),
            employee_id: actor.user_id.clone(),
            department: actor.department.clone(),
            amount: new_expense.amount,
            currency: new_expense.currency.unwrap_or(company.currency),
            category: new_expense.category,
            vendor: new_expense.vendor,
            description: new_expense.description,
            expense_date: new_expense.expense_date,
            receipt_url: new_expense.receipt_url,
            status: ExpenseStatus::Pending,
            violations: Vec::new(),
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        let outcome = self.check_compliance(&expense)?;
        let approval = Self::apply_outcome(&mut expense, outcome);
        let auto_approved = approval.is_some();

        let created = self.repository.create(expense, approval).await?;
        info!(
            "Expense {} submitted by {} as {} with {} violation(s)",
            created.id,
            actor.user_id,
            created.status,
            created.violations.len()
        );

        self.event_sink.emit(DomainEvent::expense_submitted(&created));
        if auto_approved {
            self.after_approval(&created).await;
            self.event_sink.emit(DomainEvent::expense_approved(
                &created,
                &created.employee_id,
                true,
            ));
        }
        Ok(created)
    }

    fn get_expense(&self, actor: &Actor, expense_id: &str) -> Result<Expense> {
        self.visible_expense(actor, expense_id)
    }

    fn list_expenses(&self, actor: &Actor, filter: ExpenseFilter) -> Result<Vec<Expense>> {
        let filter = filter.scoped_to(actor);
        debug!("Listing expenses for {} with {:?}", actor.user_id, filter);
        self.repository.list(&actor.company_id, &filter)
    }

    async fn update_expense(
        &self,
        actor: &Actor,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense> {
        let mut expense = self.visible_expense(actor, expense_id)?;
        if expense.employee_id != actor.user_id {
            return Err(Error::PermissionDenied(
                "only the submitter can edit an expense".to_string(),
            ));
        }
        if !expense.status.is_open() {
            return Err(Error::InvalidState(format!(
                "Expense {} is {} and can no longer be edited",
                expense.id, expense.status
            )));
        }

        update.apply_to(&mut expense)?;
        expense.updated_at = Utc::now().naive_utc();
        let outcome = self.check_compliance(&expense)?;
        let approval = Self::apply_outcome(&mut expense, outcome);
        let auto_approved = approval.is_some();

        let Some(updated) = self.repository.update_open(expense, approval).await? else {
            return Err(Error::Conflict(format!(
                "Expense {} was decided while being edited",
                expense_id
            )));
        };
        info!("Expense {} updated, now {}", updated.id, updated.status);

        if auto_approved {
            self.after_approval(&updated).await;
            self.event_sink.emit(DomainEvent::expense_approved(
                &updated,
                &updated.employee_id,
                true,
            ));
        }
        Ok(updated)
    }

    async fn delete_expense(&self, actor: &Actor, expense_id: &str) -> Result<()> {
        let expense = self.visible_expense(actor, expense_id)?;
        if expense.employee_id != actor.user_id && actor.role != Role::Admin {
            return Err(Error::PermissionDenied(
                "only the submitter or an admin can delete an expense".to_string(),
            ));
        }
        if !expense.status.is_open() {
            return Err(Error::InvalidState(format!(
                "Expense {} is {} and can no longer be deleted",
                expense.id, expense.status
            )));
        }
        if self
            .repository
            .delete_open(&actor.company_id, expense_id)
            .await?
            == 0
        {
            return Err(Error::Conflict(format!(
                "Expense {} was decided before it could be deleted",
                expense_id
            )));
        }
        info!("Expense {} deleted by {}", expense_id, actor.user_id);
        Ok(())
    }

    async fn approve_expense(
        &self,
        actor: &Actor,
        expense_id: &str,
        comments: Option<String>,
    ) -> Result<Expense> {
        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let approved = self
            .decide(actor, expense_id, ApprovalAction::Approved, comments)
            .await?;
        self.after_approval(&approved).await;
        self.event_sink.emit(DomainEvent::expense_approved(
            &approved,
            &actor.user_id,
            false,
        ));
        Ok(approved)
    }

    async fn reject_expense(
        &self,
        actor: &Actor,
        expense_id: &str,
        reason: String,
    ) -> Result<Expense> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(Error::missing_field("reason"));
        }
        let rejected = self
            .decide(actor, expense_id, ApprovalAction::Rejected, Some(reason.clone()))
            .await?;
        self.event_sink.emit(DomainEvent::expense_rejected(
            &rejected,
            &actor.user_id,
            &reason,
        ));
        Ok(rejected)
    }

    fn list_approvals(&self, actor: &Actor, expense_id: &str) -> Result<Vec<Approval>> {
        let expense = self.visible_expense(actor, expense_id)?;
        self.repository.list_approvals(&actor.company_id, &expense.id)
    }
}
