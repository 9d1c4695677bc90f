use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::expenses::ExpenseFilter;
use spendwise_core::vendors::{Vendor, VendorRepositoryTrait, VendorStats};
use spendwise_core::Result;

use super::model::VendorDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::expenses::load_expenses;
use crate::schema::vendors;
use crate::utils::format_date;

pub struct VendorRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl VendorRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl VendorRepositoryTrait for VendorRepository {
    fn list(&self, company_id: &str) -> Result<Vec<Vendor>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = vendors::table
            .filter(vendors::company_id.eq(company_id))
            .order(vendors::name.asc())
            .select(VendorDB::as_select())
            .load::<VendorDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Vendor::from).collect())
    }

    /// Upserts on `(company_id, name)`; the name column collates NOCASE, so
    /// the first spelling seen is kept.
    async fn refresh(&self, company_id: &str, vendor: &str) -> Result<Vendor> {
        let company_id = company_id.to_string();
        let vendor = vendor.trim().to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vendor> {
                let filter = ExpenseFilter {
                    vendor: Some(vendor.clone()),
                    ..ExpenseFilter::approved()
                };
                let expenses = load_expenses(conn, &company_id, &filter)?;
                let stats = VendorStats::from_expenses(&company_id, &vendor, &expenses);

                let now = Utc::now().naive_utc();
                let row = VendorDB {
                    id: Uuid::new_v4().to_string(),
                    company_id: stats.company_id,
                    name: stats.name,
                    category: stats.category.map(|c| c.as_str().to_string()),
                    total_spent: stats.total_spent.to_string(),
                    transaction_count: stats.transaction_count,
                    last_transaction_date: stats.last_transaction_date.map(format_date),
                    created_at: now,
                    updated_at: now,
                };
                let stored = diesel::insert_into(vendors::table)
                    .values(&row)
                    .on_conflict((vendors::company_id, vendors::name))
                    .do_update()
                    .set((
                        vendors::category.eq(&row.category),
                        vendors::total_spent.eq(&row.total_spent),
                        vendors::transaction_count.eq(row.transaction_count),
                        vendors::last_transaction_date.eq(&row.last_transaction_date),
                        vendors::updated_at.eq(now),
                    ))
                    .returning(VendorDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(stored.into())
            })
            .await
    }
}
