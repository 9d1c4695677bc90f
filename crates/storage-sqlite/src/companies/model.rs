//! Database models for companies.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use spendwise_core::companies::Company;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompanyDB {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CompanyDB> for Company {
    fn from(db: CompanyDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
