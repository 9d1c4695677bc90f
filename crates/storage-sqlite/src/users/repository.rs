use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::users::{NewUser, User, UserRepositoryTrait, UserRoleUpdate};
use spendwise_core::{Error, Result};

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load(conn: &mut SqliteConnection, company_id: &str, user_id: &str) -> Result<User> {
    users::table
        .filter(users::company_id.eq(company_id))
        .filter(users::id.eq(user_id))
        .select(UserDB::as_select())
        .first::<UserDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(User::from)
        .ok_or_else(|| Error::NotFound("User".to_string()))
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, company_id: &str, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        load(&mut conn, company_id, user_id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    fn list(&self, company_id: &str, department: Option<&str>) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = users::table
            .filter(users::company_id.eq(company_id))
            .into_boxed();
        if let Some(department) = department {
            query = query.filter(users::department.eq(department));
        }
        let rows = query
            .order(users::name.asc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let now = Utc::now().naive_utc();
                let row = UserDB {
                    id: Uuid::new_v4().to_string(),
                    company_id: new_user.company_id,
                    name: new_user.name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    role: new_user.role.as_str().to_string(),
                    department: new_user.department,
                    manager_id: new_user.manager_id,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };
                let inserted = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into())
            })
            .await
    }

    async fn update_role(
        &self,
        company_id: &str,
        user_id: &str,
        update: UserRoleUpdate,
    ) -> Result<User> {
        let company_id = company_id.to_string();
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let mut user = load(conn, &company_id, &user_id)?;
                if let Some(role) = update.role {
                    user.role = role;
                }
                if let Some(department) = update.department {
                    user.department = department;
                }
                if let Some(manager_id) = update.manager_id {
                    user.manager_id = Some(manager_id);
                }
                if let Some(is_active) = update.is_active {
                    user.is_active = is_active;
                }
                user.updated_at = Utc::now().naive_utc();

                let row = UserDB::from(user);
                let updated = diesel::update(users::table.find(&row.id))
                    .set(&row)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(updated.into())
            })
            .await
    }
}
