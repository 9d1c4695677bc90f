use async_trait::async_trait;

use super::users_model::{Actor, NewUser, RegisterUser, User, UserRoleUpdate};
use crate::companies::Company;
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, company_id: &str, user_id: &str) -> Result<User>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    fn list(&self, company_id: &str, department: Option<&str>) -> Result<Vec<User>>;
    async fn create(&self, new_user: NewUser) -> Result<User>;
    async fn update_role(
        &self,
        company_id: &str,
        user_id: &str,
        update: UserRoleUpdate,
    ) -> Result<User>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Registers a user, creating their company first when requested.
    async fn register(&self, request: RegisterUser) -> Result<(User, Company)>;
    /// Looks up an active user for login. Unknown or inactive users yield `None`.
    fn find_active_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Actor for an authenticated user id, read fresh so role changes and
    /// deactivation apply to tokens already issued.
    fn find_active_actor(&self, company_id: &str, user_id: &str) -> Result<Option<Actor>>;
    fn get_user(&self, actor: &Actor, user_id: &str) -> Result<User>;
    fn list_users(&self, actor: &Actor) -> Result<Vec<User>>;
    async fn update_role(
        &self,
        actor: &Actor,
        user_id: &str,
        update: UserRoleUpdate,
    ) -> Result<User>;
}
