//! Database models for policies.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use spendwise_core::policies::Policy;

use crate::utils::parse_decimal;

/// Thresholds are stored as decimal strings and the blacklist as a JSON array.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::policies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PolicyDB {
    pub id: String,
    pub company_id: String,
    pub department: String,
    pub meal_limit_per_day: String,
    pub hotel_limit_per_night: String,
    pub receipt_required_over: String,
    pub auto_approve_limit: String,
    pub blacklisted_vendors: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PolicyDB> for Policy {
    fn from(db: PolicyDB) -> Self {
        let blacklisted_vendors = serde_json::from_str(&db.blacklisted_vendors)
            .unwrap_or_else(|e| {
                log::error!(
                    "Failed to parse blacklist of policy {}: {}",
                    db.id,
                    e
                );
                Vec::new()
            });
        Self {
            meal_limit_per_day: parse_decimal(&db.meal_limit_per_day, "meal_limit_per_day"),
            hotel_limit_per_night: parse_decimal(
                &db.hotel_limit_per_night,
                "hotel_limit_per_night",
            ),
            receipt_required_over: parse_decimal(
                &db.receipt_required_over,
                "receipt_required_over",
            ),
            auto_approve_limit: parse_decimal(&db.auto_approve_limit, "auto_approve_limit"),
            blacklisted_vendors,
            id: db.id,
            company_id: db.company_id,
            department: db.department,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TryFrom<Policy> for PolicyDB {
    type Error = serde_json::Error;

    fn try_from(domain: Policy) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            blacklisted_vendors: serde_json::to_string(&domain.blacklisted_vendors)?,
            id: domain.id,
            company_id: domain.company_id,
            department: domain.department,
            meal_limit_per_day: domain.meal_limit_per_day.to_string(),
            hotel_limit_per_night: domain.hotel_limit_per_night.to_string(),
            receipt_required_over: domain.receipt_required_over.to_string(),
            auto_approve_limit: domain.auto_approve_limit.to_string(),
            is_active: domain.is_active,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}
