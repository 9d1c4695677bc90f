use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::policies::{NewPolicy, Policy, PolicyRepositoryTrait};
use spendwise_core::{Error, Result};

use super::model::PolicyDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::policies;

pub struct PolicyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PolicyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PolicyRepositoryTrait for PolicyRepository {
    fn list(&self, company_id: &str) -> Result<Vec<Policy>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = policies::table
            .filter(policies::company_id.eq(company_id))
            .order(policies::department.asc())
            .select(PolicyDB::as_select())
            .load::<PolicyDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Policy::from).collect())
    }

    fn get_by_id(&self, company_id: &str, policy_id: &str) -> Result<Policy> {
        let mut conn = get_connection(&self.pool)?;
        policies::table
            .filter(policies::company_id.eq(company_id))
            .filter(policies::id.eq(policy_id))
            .select(PolicyDB::as_select())
            .first::<PolicyDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Policy::from)
            .ok_or_else(|| Error::NotFound("Policy".to_string()))
    }

    fn find_by_department(&self, company_id: &str, department: &str) -> Result<Option<Policy>> {
        let mut conn = get_connection(&self.pool)?;
        let row = policies::table
            .filter(policies::company_id.eq(company_id))
            .filter(policies::department.eq(department))
            .select(PolicyDB::as_select())
            .first::<PolicyDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Policy::from))
    }

    async fn create(&self, company_id: &str, new_policy: NewPolicy) -> Result<Policy> {
        let company_id = company_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Policy> {
                let now = Utc::now().naive_utc();
                let policy = Policy {
                    id: Uuid::new_v4().to_string(),
                    company_id,
                    department: new_policy.department,
                    meal_limit_per_day: new_policy.meal_limit_per_day,
                    hotel_limit_per_night: new_policy.hotel_limit_per_night,
                    receipt_required_over: new_policy.receipt_required_over,
                    auto_approve_limit: new_policy.auto_approve_limit,
                    blacklisted_vendors: new_policy.blacklisted_vendors,
                    is_active: new_policy.is_active,
                    created_at: now,
                    updated_at: now,
                };
                let row = PolicyDB::try_from(policy).into_core()?;
                let inserted = diesel::insert_into(policies::table)
                    .values(&row)
                    .returning(PolicyDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into())
            })
            .await
    }

    async fn update(&self, mut policy: Policy) -> Result<Policy> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Policy> {
                policy.updated_at = Utc::now().naive_utc();
                let row = PolicyDB::try_from(policy).into_core()?;
                let updated = diesel::update(
                    policies::table
                        .filter(policies::company_id.eq(&row.company_id))
                        .filter(policies::id.eq(&row.id)),
                )
                .set(&row)
                .returning(PolicyDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| Error::NotFound("Policy".to_string()))?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete(&self, company_id: &str, policy_id: &str) -> Result<usize> {
        let company_id = company_id.to_string();
        let policy_id = policy_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    policies::table
                        .filter(policies::company_id.eq(&company_id))
                        .filter(policies::id.eq(&policy_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }
}
