use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::companies::{Company, CompanyRepositoryTrait, CompanyUpdate, NewCompany};
use spendwise_core::{Error, Result};

use super::model::CompanyDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::companies;

pub struct CompanyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CompanyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load(conn: &mut SqliteConnection, company_id: &str) -> Result<Company> {
    companies::table
        .find(company_id)
        .select(CompanyDB::as_select())
        .first::<CompanyDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Company::from)
        .ok_or_else(|| Error::NotFound("Company".to_string()))
}

#[async_trait]
impl CompanyRepositoryTrait for CompanyRepository {
    fn get_by_id(&self, company_id: &str) -> Result<Company> {
        let mut conn = get_connection(&self.pool)?;
        load(&mut conn, company_id)
    }

    async fn create(&self, new_company: NewCompany) -> Result<Company> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Company> {
                let now = Utc::now().naive_utc();
                let row = CompanyDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_company.name,
                    currency: new_company.currency,
                    created_at: now,
                    updated_at: now,
                };
                let inserted = diesel::insert_into(companies::table)
                    .values(&row)
                    .returning(CompanyDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into())
            })
            .await
    }

    async fn update(&self, company_id: &str, update: CompanyUpdate) -> Result<Company> {
        let company_id = company_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Company> {
                let mut row: CompanyDB = companies::table
                    .find(&company_id)
                    .select(CompanyDB::as_select())
                    .first(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound("Company".to_string()))?;
                if let Some(name) = update.name {
                    row.name = name.trim().to_string();
                }
                if let Some(currency) = update.currency {
                    row.currency = currency;
                }
                row.updated_at = Utc::now().naive_utc();

                diesel::update(companies::table.find(&company_id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load(conn, &company_id)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup, COMPANY};

    #[tokio::test]
    async fn create_then_rename() {
        let db = setup().await;
        let repo = CompanyRepository::new(db.pool.clone(), db.writer.clone());
        let created = repo
            .create(NewCompany {
                name: "Globex".to_string(),
                currency: "EUR".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(repo.get_by_id(&created.id).unwrap().currency, "EUR");

        let renamed = repo
            .update(
                &created.id,
                CompanyUpdate {
                    name: Some(" Globex Corp ".to_string()),
                    currency: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Globex Corp");
        assert_eq!(renamed.currency, "EUR");
        assert!(repo.get_by_id(COMPANY).is_ok());
    }

    #[tokio::test]
    async fn unknown_company_is_not_found() {
        let db = setup().await;
        let repo = CompanyRepository::new(db.pool.clone(), db.writer.clone());
        assert!(matches!(repo.get_by_id("missing"), Err(Error::NotFound(_))));
        assert!(matches!(
            repo.update("missing", CompanyUpdate::default()).await,
            Err(Error::NotFound(_))
        ));
    }
}
