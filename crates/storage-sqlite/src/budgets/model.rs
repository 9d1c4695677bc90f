//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use spendwise_core::budgets::{Budget, BudgetPeriod};
use spendwise_core::expenses::ExpenseCategory;

use crate::utils::{format_date, parse_date, parse_decimal, parse_enum};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BudgetDB {
    pub id: String,
    pub company_id: String,
    pub department: String,
    pub category: Option<String>,
    pub amount: String,
    pub spent: String,
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub alert_threshold: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<BudgetDB> for Budget {
    fn from(db: BudgetDB) -> Self {
        Self {
            category: db
                .category
                .as_deref()
                .map(|c| parse_enum(c, "category", ExpenseCategory::Other)),
            amount: parse_decimal(&db.amount, "amount"),
            spent: parse_decimal(&db.spent, "spent"),
            period: parse_enum(&db.period, "period", BudgetPeriod::Monthly),
            start_date: parse_date(&db.start_date, "start_date"),
            end_date: parse_date(&db.end_date, "end_date"),
            id: db.id,
            company_id: db.company_id,
            department: db.department,
            alert_threshold: db.alert_threshold,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Budget> for BudgetDB {
    fn from(domain: Budget) -> Self {
        Self {
            id: domain.id,
            company_id: domain.company_id,
            department: domain.department,
            category: domain.category.map(|c| c.as_str().to_string()),
            amount: domain.amount.to_string(),
            spent: domain.spent.to_string(),
            period: domain.period.as_str().to_string(),
            start_date: format_date(domain.start_date),
            end_date: format_date(domain.end_date),
            alert_threshold: domain.alert_threshold,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
