//! Policy compliance check run on every submitted (or edited) expense.
//!
//! The rules are a flat list with no ordering dependency: every rule is
//! evaluated and every failure is recorded as a [`Violation`].

use rust_decimal::Decimal;

use super::policies_model::Policy;
use crate::constants::FALLBACK_AUTO_APPROVE_LIMIT;
use crate::expenses::{ExpenseCategory, ExpenseStatus, Severity, Violation};

pub const RULE_RECEIPT_REQUIRED: &str = "Receipt Required";
pub const RULE_MEAL_LIMIT: &str = "Meal Limit Exceeded";
pub const RULE_HOTEL_LIMIT: &str = "Hotel Limit Exceeded";
pub const RULE_BLACKLISTED_VENDOR: &str = "Blacklisted Vendor";

/// The expense facts the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceInput<'a> {
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub vendor: &'a str,
    pub receipt_url: Option<&'a str>,
}

impl ComplianceInput<'_> {
    fn has_receipt(&self) -> bool {
        self.receipt_url.is_some_and(|url| !url.trim().is_empty())
    }
}

/// Result of the compliance check.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceOutcome {
    /// `Approved`, `Flagged` or `Pending`
    pub status: ExpenseStatus,
    pub violations: Vec<Violation>,
}

impl ComplianceOutcome {
    pub fn is_auto_approved(&self) -> bool {
        self.status == ExpenseStatus::Approved
    }
}

/// Decides the initial status of an expense.
///
/// Without an active policy the expense is treated as compliant and is
/// auto-approved only when it is below the fallback limit.
pub fn evaluate(input: &ComplianceInput<'_>, policy: Option<&Policy>) -> ComplianceOutcome {
    let Some(policy) = policy.filter(|p| p.is_active) else {
        return ComplianceOutcome {
            status: if input.amount < FALLBACK_AUTO_APPROVE_LIMIT {
                ExpenseStatus::Approved
            } else {
                ExpenseStatus::Pending
            },
            violations: Vec::new(),
        };
    };

    let mut violations = Vec::new();

    if input.amount > policy.receipt_required_over && !input.has_receipt() {
        violations.push(Violation::new(
            RULE_RECEIPT_REQUIRED,
            format!(
                "A receipt is required for expenses over {}",
                policy.receipt_required_over
            ),
            Severity::High,
        ));
    }

    if input.category == ExpenseCategory::Meals && input.amount > policy.meal_limit_per_day {
        violations.push(Violation::new(
            RULE_MEAL_LIMIT,
            format!(
                "Meal expense of {} exceeds the daily limit of {}",
                input.amount, policy.meal_limit_per_day
            ),
            Severity::Medium,
        ));
    }

    if input.category == ExpenseCategory::Accommodation
        && input.amount > policy.hotel_limit_per_night
    {
        violations.push(Violation::new(
            RULE_HOTEL_LIMIT,
            format!(
                "Accommodation expense of {} exceeds the nightly limit of {}",
                input.amount, policy.hotel_limit_per_night
            ),
            Severity::Medium,
        ));
    }

    if policy.is_blacklisted(input.vendor) {
        violations.push(Violation::new(
            RULE_BLACKLISTED_VENDOR,
            format!("Vendor '{}' is not approved for company spend", input.vendor.trim()),
            Severity::High,
        ));
    }

    let status = if !violations.is_empty() {
        ExpenseStatus::Flagged
    } else if input.amount < policy.auto_approve_limit {
        ExpenseStatus::Approved
    } else {
        ExpenseStatus::Pending
    };

    ComplianceOutcome { status, violations }
}
