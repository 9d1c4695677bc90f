use async_trait::async_trait;

use super::policies_model::{NewPolicy, Policy, PolicyUpdate};
use crate::errors::Result;
use crate::users::Actor;

/// Trait for policy repository operations
#[async_trait]
pub trait PolicyRepositoryTrait: Send + Sync {
    fn list(&self, company_id: &str) -> Result<Vec<Policy>>;
    fn get_by_id(&self, company_id: &str, policy_id: &str) -> Result<Policy>;
    fn find_by_department(&self, company_id: &str, department: &str) -> Result<Option<Policy>>;
    async fn create(&self, company_id: &str, new_policy: NewPolicy) -> Result<Policy>;
    async fn update(&self, policy: Policy) -> Result<Policy>;
    async fn delete(&self, company_id: &str, policy_id: &str) -> Result<usize>;
}

/// Trait for policy service operations
#[async_trait]
pub trait PolicyServiceTrait: Send + Sync {
    fn list_policies(&self, actor: &Actor) -> Result<Vec<Policy>>;
    fn get_policy(&self, actor: &Actor, policy_id: &str) -> Result<Policy>;
    /// Active policy governing `department`, if any.
    fn policy_for_department(&self, company_id: &str, department: &str)
        -> Result<Option<Policy>>;
    async fn create_policy(&self, actor: &Actor, new_policy: NewPolicy) -> Result<Policy>;
    async fn update_policy(
        &self,
        actor: &Actor,
        policy_id: &str,
        update: PolicyUpdate,
    ) -> Result<Policy>;
    async fn delete_policy(&self, actor: &Actor, policy_id: &str) -> Result<()>;
}
