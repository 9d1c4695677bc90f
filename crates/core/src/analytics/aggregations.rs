//! Pure aggregations behind the dashboards. Spend figures only count
//! approved expenses; status counters look at everything they are given.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use super::analytics_model::{ChartPoint, ComplianceStats, MonthlyPoint, SpendSummary, SpenderTotal};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::expenses::{Expense, ExpenseStatus};
use crate::users::User;

/// `part` as a percentage of `whole`, rounded for display. Zero when `whole`
/// is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION)
}

fn approved(expenses: &[Expense]) -> impl Iterator<Item = &Expense> {
    expenses
        .iter()
        .filter(|e| e.status == ExpenseStatus::Approved)
}

pub fn summarize(expenses: &[Expense]) -> SpendSummary {
    let mut summary = SpendSummary {
        expense_count: expenses.len(),
        ..Default::default()
    };
    for expense in expenses {
        match expense.status {
            ExpenseStatus::Pending => {
                summary.pending_count += 1;
                summary.pending_total += expense.amount;
            }
            ExpenseStatus::Flagged => {
                summary.flagged_count += 1;
                summary.pending_total += expense.amount;
            }
            ExpenseStatus::Approved => {
                summary.approved_count += 1;
                summary.approved_total += expense.amount;
            }
            ExpenseStatus::Rejected => summary.rejected_count += 1,
        }
    }
    if summary.approved_count > 0 {
        summary.average_expense = (summary.approved_total
            / Decimal::from(summary.approved_count))
        .round_dp(DISPLAY_DECIMAL_PRECISION);
    }
    summary
}

/// Groups approved spend under `key`, largest first.
fn group_approved<F>(expenses: &[Expense], key: F) -> Vec<ChartPoint>
where
    F: Fn(&Expense) -> String,
{
    let mut groups: HashMap<String, (Decimal, usize)> = HashMap::new();
    for expense in approved(expenses) {
        let entry = groups.entry(key(expense)).or_insert((Decimal::ZERO, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }
    let mut points: Vec<ChartPoint> = groups
        .into_iter()
        .map(|(label, (value, count))| ChartPoint {
            label,
            value,
            count,
        })
        .collect();
    points.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    points
}

pub fn spend_by_category(expenses: &[Expense]) -> Vec<ChartPoint> {
    group_approved(expenses, |e| e.category.as_str().to_string())
}

pub fn spend_by_department(expenses: &[Expense]) -> Vec<ChartPoint> {
    group_approved(expenses, |e| e.department.clone())
}

/// Approved spend per month for the `months` months ending with `today`'s
/// month, oldest first. Months without spend are present with zero.
pub fn monthly_trend(expenses: &[Expense], today: NaiveDate, months: u32) -> Vec<MonthlyPoint> {
    let current = today.with_day(1).unwrap_or(today);
    let first = current
        .checked_sub_months(Months::new(months.saturating_sub(1)))
        .unwrap_or(current);

    let mut buckets: BTreeMap<(i32, u32), (Decimal, usize)> = BTreeMap::new();
    let mut month = first;
    while month <= current {
        buckets.insert((month.year(), month.month()), (Decimal::ZERO, 0));
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }

    for expense in approved(expenses) {
        let date = expense.expense_date;
        if let Some(bucket) = buckets.get_mut(&(date.year(), date.month())) {
            bucket.0 += expense.amount;
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (value, count))| MonthlyPoint {
            month: format!("{:04}-{:02}", year, month),
            value,
            count,
        })
        .collect()
}

pub fn compliance_stats(expenses: &[Expense]) -> ComplianceStats {
    let with_violations = expenses.iter().filter(|e| !e.violations.is_empty()).count();

    let mut by_rule: HashMap<&str, usize> = HashMap::new();
    for violation in expenses.iter().flat_map(|e| e.violations.iter()) {
        *by_rule.entry(violation.rule.as_str()).or_insert(0) += 1;
    }
    let mut violations_by_rule: Vec<ChartPoint> = by_rule
        .into_iter()
        .map(|(rule, count)| ChartPoint {
            label: rule.to_string(),
            value: Decimal::from(count),
            count,
        })
        .collect();
    violations_by_rule.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let compliance_rate = if expenses.is_empty() {
        Decimal::ONE_HUNDRED
    } else {
        percentage(
            Decimal::from(expenses.len() - with_violations),
            Decimal::from(expenses.len()),
        )
    };

    ComplianceStats {
        expense_count: expenses.len(),
        with_violations,
        compliance_rate,
        violations_by_rule,
    }
}

/// Employees with the most approved spend. Unknown employee ids fall back to
/// the id as display name.
pub fn top_spenders(expenses: &[Expense], users: &[User], limit: usize) -> Vec<SpenderTotal> {
    let names: HashMap<&str, &str> = users
        .iter()
        .map(|u| (u.id.as_str(), u.name.as_str()))
        .collect();
    let mut totals: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for expense in approved(expenses) {
        let entry = totals
            .entry(expense.employee_id.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }
    let mut spenders: Vec<SpenderTotal> = totals
        .into_iter()
        .map(|(employee_id, (value, count))| SpenderTotal {
            employee_id: employee_id.to_string(),
            name: names.get(employee_id).unwrap_or(&employee_id).to_string(),
            value,
            count,
        })
        .collect();
    spenders.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    spenders.truncate(limit);
    spenders
}
