//! Database models for vendors.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use spendwise_core::expenses::ExpenseCategory;
use spendwise_core::vendors::Vendor;

use crate::utils::{parse_date, parse_decimal, parse_enum};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::vendors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VendorDB {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub category: Option<String>,
    pub total_spent: String,
    pub transaction_count: i32,
    pub last_transaction_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The average is derived, never stored.
impl From<VendorDB> for Vendor {
    fn from(db: VendorDB) -> Self {
        let total_spent = parse_decimal(&db.total_spent, "total_spent");
        Self {
            category: db
                .category
                .as_deref()
                .map(|c| parse_enum(c, "category", ExpenseCategory::Other)),
            average_transaction: Vendor::average(total_spent, db.transaction_count),
            total_spent,
            last_transaction_date: db
                .last_transaction_date
                .as_deref()
                .map(|d| parse_date(d, "last_transaction_date")),
            id: db.id,
            company_id: db.company_id,
            name: db.name,
            transaction_count: db.transaction_count,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
