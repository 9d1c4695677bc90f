use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use spendwise_core::budgets::{Budget, BudgetRepositoryTrait, NewBudget};
use spendwise_core::constants::DEFAULT_ALERT_THRESHOLD;
use spendwise_core::{Error, Result};

use super::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::expenses::load_expenses;
use crate::schema::budgets;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn list(&self, company_id: &str, department: Option<&str>) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = budgets::table
            .filter(budgets::company_id.eq(company_id))
            .into_boxed();
        if let Some(department) = department {
            query = query.filter(budgets::department.eq(department));
        }
        let rows = query
            .order((budgets::department.asc(), budgets::start_date.desc()))
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Budget::from).collect())
    }

    fn get_by_id(&self, company_id: &str, budget_id: &str) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;
        budgets::table
            .filter(budgets::company_id.eq(company_id))
            .filter(budgets::id.eq(budget_id))
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Budget::from)
            .ok_or_else(|| Error::NotFound("Budget".to_string()))
    }

    async fn create(&self, company_id: &str, new_budget: NewBudget) -> Result<Budget> {
        let company_id = company_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let now = Utc::now().naive_utc();
                let budget = Budget {
                    id: Uuid::new_v4().to_string(),
                    company_id,
                    end_date: new_budget
                        .end_date
                        .unwrap_or_else(|| new_budget.period.end_for(new_budget.start_date)),
                    department: new_budget.department,
                    category: new_budget.category,
                    amount: new_budget.amount,
                    spent: Decimal::ZERO,
                    period: new_budget.period,
                    start_date: new_budget.start_date,
                    alert_threshold: new_budget
                        .alert_threshold
                        .unwrap_or(DEFAULT_ALERT_THRESHOLD),
                    created_at: now,
                    updated_at: now,
                };
                let inserted = diesel::insert_into(budgets::table)
                    .values(&BudgetDB::from(budget))
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into())
            })
            .await
    }

    async fn update(&self, mut budget: Budget) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                budget.updated_at = Utc::now().naive_utc();
                let row = BudgetDB::from(budget);
                diesel::update(
                    budgets::table
                        .filter(budgets::company_id.eq(&row.company_id))
                        .filter(budgets::id.eq(&row.id)),
                )
                .set(&row)
                .returning(BudgetDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .map(Budget::from)
                .ok_or_else(|| Error::NotFound("Budget".to_string()))
            })
            .await
    }

    async fn recompute_spent(&self, company_id: &str, budget_id: &str) -> Result<Budget> {
        let company_id = company_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let budget = budgets::table
                    .filter(budgets::company_id.eq(&company_id))
                    .filter(budgets::id.eq(&budget_id))
                    .select(BudgetDB::as_select())
                    .first::<BudgetDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .map(Budget::from)
                    .ok_or_else(|| Error::NotFound("Budget".to_string()))?;

                let spent: Decimal = load_expenses(conn, &company_id, &budget.spending_filter())?
                    .iter()
                    .map(|e| e.amount)
                    .sum();
                if spent == budget.spent {
                    return Ok(budget);
                }

                let updated = diesel::update(
                    budgets::table
                        .filter(budgets::company_id.eq(&company_id))
                        .filter(budgets::id.eq(&budget_id)),
                )
                .set((
                    budgets::spent.eq(spent.to_string()),
                    budgets::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(BudgetDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete(&self, company_id: &str, budget_id: &str) -> Result<usize> {
        let company_id = company_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    budgets::table
                        .filter(budgets::company_id.eq(&company_id))
                        .filter(budgets::id.eq(&budget_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }
}
