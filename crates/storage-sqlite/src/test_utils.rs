//! Temporary databases for repository tests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use spendwise_core::expenses::{Expense, ExpenseCategory, ExpenseStatus};
use tempfile::TempDir;
use uuid::Uuid;

use crate::companies::CompanyDB;
use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::{companies, users};
use crate::users::UserDB;

pub const COMPANY: &str = "company-1";
pub const OTHER_COMPANY: &str = "company-2";

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

/// Migrated database in a temp directory with [`COMPANY`] already present.
pub async fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    seed_company(&pool, COMPANY);
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub fn seed_company(pool: &DbPool, company_id: &str) {
    let now = Utc::now().naive_utc();
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::insert_into(companies::table)
        .values(&CompanyDB {
            id: company_id.to_string(),
            name: format!("Company {}", company_id),
            currency: "USD".to_string(),
            created_at: now,
            updated_at: now,
        })
        .execute(&mut conn)
        .expect("Failed to seed company");
}

pub fn seed_user(pool: &DbPool, company_id: &str, user_id: &str, department: &str) {
    let now = Utc::now().naive_utc();
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::insert_into(users::table)
        .values(&UserDB {
            id: user_id.to_string(),
            company_id: company_id.to_string(),
            name: format!("User {}", user_id),
            email: format!("{}@{}.example.com", user_id, company_id),
            password_hash: "$argon2id$stub".to_string(),
            role: "employee".to_string(),
            department: department.to_string(),
            manager_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .execute(&mut conn)
        .expect("Failed to seed user");
}

/// An approved Sales travel expense, ready for `ExpenseRepository::create`.
pub fn approved_expense(
    company_id: &str,
    employee_id: &str,
    amount: Decimal,
    vendor: &str,
    expense_date: NaiveDate,
) -> Expense {
    let now = Utc::now().naive_utc();
    Expense {
        id: Uuid::new_v4().to_string(),
        company_id: company_id.to_string(),
        employee_id: employee_id.to_string(),
        department: "Sales".to_string(),
        amount,
        currency: "USD".to_string(),
        category: ExpenseCategory::Travel,
        vendor: vendor.to_string(),
        description: None,
        expense_date,
        receipt_url: None,
        status: ExpenseStatus::Approved,
        violations: Vec::new(),
        approved_by: Some("manager-1".to_string()),
        approved_at: Some(now),
        rejection_reason: None,
        created_at: now,
        updated_at: now,
    }
}
