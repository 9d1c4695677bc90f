//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use spendwise_core::users::{Role, User};

use crate::utils::parse_enum;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct UserDB {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub department: String,
    pub manager_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            role: parse_enum(&db.role, "role", Role::Employee),
            id: db.id,
            company_id: db.company_id,
            name: db.name,
            email: db.email,
            password_hash: db.password_hash,
            department: db.department,
            manager_id: db.manager_id,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<User> for UserDB {
    fn from(domain: User) -> Self {
        Self {
            id: domain.id,
            company_id: domain.company_id,
            name: domain.name,
            email: domain.email,
            password_hash: domain.password_hash,
            role: domain.role.as_str().to_string(),
            department: domain.department,
            manager_id: domain.manager_id,
            is_active: domain.is_active,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
