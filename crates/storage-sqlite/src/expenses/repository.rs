use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel::SqliteConnection;
use log::debug;

use spendwise_core::expenses::{
    Approval, Expense, ExpenseDecision, ExpenseFilter, ExpenseRepositoryTrait, ExpenseStatus,
};
use spendwise_core::{Error, Result};

use super::model::{ApprovalDB, ExpenseDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{approvals, expenses};
use crate::utils::format_date;

pub struct ExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

diesel::define_sql_function!(fn lower(x: Text) -> Text);

/// Loads a company's expenses matching `filter`, newest first. Shared with
/// the writer jobs that derive budget and vendor figures.
pub(crate) fn load_expenses(
    conn: &mut SqliteConnection,
    company_id: &str,
    filter: &ExpenseFilter,
) -> Result<Vec<Expense>> {
    let mut query = expenses::table
        .filter(expenses::company_id.eq(company_id))
        .into_boxed();

    if let Some(status) = filter.status {
        query = query.filter(expenses::status.eq(status.as_str()));
    }
    if let Some(category) = filter.category {
        query = query.filter(expenses::category.eq(category.as_str()));
    }
    if let Some(department) = &filter.department {
        query = query.filter(expenses::department.eq(department.clone()));
    }
    if let Some(employee_id) = &filter.employee_id {
        query = query.filter(expenses::employee_id.eq(employee_id.clone()));
    }
    if let Some(vendor) = &filter.vendor {
        query = query.filter(lower(expenses::vendor).eq(vendor.trim().to_ascii_lowercase()));
    }
    // ISO dates order the same as text
    if let Some(from) = filter.from {
        query = query.filter(expenses::expense_date.ge(format_date(from)));
    }
    if let Some(to) = filter.to {
        query = query.filter(expenses::expense_date.le(format_date(to)));
    }

    let rows = query
        .order((expenses::expense_date.desc(), expenses::created_at.desc()))
        .select(ExpenseDB::as_select())
        .load::<ExpenseDB>(conn)
        .map_err(StorageError::from)?;
    Ok(rows.into_iter().map(Expense::from).collect())
}

fn open_statuses() -> Vec<&'static str> {
    ExpenseStatus::OPEN.iter().map(|s| s.as_str()).collect()
}

fn insert_approval(conn: &mut SqliteConnection, approval: Approval) -> Result<Approval> {
    let inserted = diesel::insert_into(approvals::table)
        .values(&ApprovalDB::from(approval))
        .returning(ApprovalDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?;
    Ok(inserted.into())
}

/// Overwrites the stored expense only while it is still pending or flagged.
/// Returns `None` when the guard did not match.
fn update_if_open(conn: &mut SqliteConnection, expense: Expense) -> Result<Option<Expense>> {
    let row = ExpenseDB::try_from(expense).into_core()?;
    let updated = diesel::update(
        expenses::table
            .filter(expenses::company_id.eq(&row.company_id))
            .filter(expenses::id.eq(&row.id))
            .filter(expenses::status.eq_any(open_statuses())),
    )
    .set(&row)
    .returning(ExpenseDB::as_returning())
    .get_result(conn)
    .optional()
    .map_err(StorageError::from)?;
    Ok(updated.map(Expense::from))
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    fn get_by_id(&self, company_id: &str, expense_id: &str) -> Result<Expense> {
        let mut conn = get_connection(&self.pool)?;
        expenses::table
            .filter(expenses::company_id.eq(company_id))
            .filter(expenses::id.eq(expense_id))
            .select(ExpenseDB::as_select())
            .first::<ExpenseDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Expense::from)
            .ok_or_else(|| Error::NotFound("Expense".to_string()))
    }

    fn list(&self, company_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        load_expenses(&mut conn, company_id, filter)
    }

    fn list_approvals(&self, company_id: &str, expense_id: &str) -> Result<Vec<Approval>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = approvals::table
            .filter(approvals::company_id.eq(company_id))
            .filter(approvals::expense_id.eq(expense_id))
            .order(approvals::created_at.asc())
            .select(ApprovalDB::as_select())
            .load::<ApprovalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Approval::from).collect())
    }

    async fn create(&self, expense: Expense, approval: Option<Approval>) -> Result<Expense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let row = ExpenseDB::try_from(expense).into_core()?;
                let inserted = diesel::insert_into(expenses::table)
                    .values(&row)
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                if let Some(approval) = approval {
                    insert_approval(conn, approval)?;
                }
                Ok(inserted.into())
            })
            .await
    }

    async fn update_open(
        &self,
        expense: Expense,
        approval: Option<Approval>,
    ) -> Result<Option<Expense>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Expense>> {
                let Some(updated) = update_if_open(conn, expense)? else {
                    return Ok(None);
                };
                if let Some(approval) = approval {
                    insert_approval(conn, approval)?;
                }
                Ok(Some(updated))
            })
            .await
    }

    async fn record_decision(
        &self,
        decision: ExpenseDecision,
    ) -> Result<Option<(Expense, Approval)>> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<(Expense, Approval)>> {
                    let current = expenses::table
                        .filter(expenses::company_id.eq(&decision.company_id))
                        .filter(expenses::id.eq(&decision.expense_id))
                        .select(ExpenseDB::as_select())
                        .first::<ExpenseDB>(conn)
                        .optional()
                        .map_err(StorageError::from)?;
                    let Some(current) = current else {
                        return Ok(None);
                    };

                    let mut expense = Expense::from(current);
                    decision.apply_to(&mut expense);
                    let Some(updated) = update_if_open(conn, expense)? else {
                        debug!(
                            "Expense {} was already decided; skipping {}",
                            decision.expense_id, decision.action
                        );
                        return Ok(None);
                    };
                    let approval = insert_approval(conn, decision.approval_record())?;
                    Ok(Some((updated, approval)))
                },
            )
            .await
    }

    async fn delete_open(&self, company_id: &str, expense_id: &str) -> Result<usize> {
        let company_id = company_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    expenses::table
                        .filter(expenses::company_id.eq(&company_id))
                        .filter(expenses::id.eq(&expense_id))
                        .filter(expenses::status.eq_any(open_statuses())),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }
}
