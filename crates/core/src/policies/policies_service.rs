use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::policies_model::{NewPolicy, Policy, PolicyUpdate};
use super::policies_traits::{PolicyRepositoryTrait, PolicyServiceTrait};
use crate::errors::Result;
use crate::users::{Actor, Role};
use crate::Error;

/// Service for managing department policies
pub struct PolicyService {
    repository: Arc<dyn PolicyRepositoryTrait>,
}

impl PolicyService {
    pub fn new(repository: Arc<dyn PolicyRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PolicyServiceTrait for PolicyService {
    fn list_policies(&self, actor: &Actor) -> Result<Vec<Policy>> {
        let policies = self.repository.list(&actor.company_id)?;
        Ok(match actor.role {
            Role::Employee => policies
                .into_iter()
                .filter(|p| p.department == actor.department)
                .collect(),
            _ => policies,
        })
    }

    fn get_policy(&self, actor: &Actor, policy_id: &str) -> Result<Policy> {
        let policy = self.repository.get_by_id(&actor.company_id, policy_id)?;
        if actor.role == Role::Employee && policy.department != actor.department {
            return Err(Error::PermissionDenied(
                "employees can only view their own department's policy".to_string(),
            ));
        }
        Ok(policy)
    }

    fn policy_for_department(
        &self,
        company_id: &str,
        department: &str,
    ) -> Result<Option<Policy>> {
        Ok(self
            .repository
            .find_by_department(company_id, department)?
            .filter(|p| p.is_active))
    }

    async fn create_policy(&self, actor: &Actor, new_policy: NewPolicy) -> Result<Policy> {
        actor.require(&Role::FINANCE_ADMINS, "create policies")?;
        let new_policy = new_policy.normalized()?;

        if self
            .repository
            .find_by_department(&actor.company_id, &new_policy.department)?
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "A policy for department '{}' already exists",
                new_policy.department
            )));
        }

        let policy = self.repository.create(&actor.company_id, new_policy).await?;
        info!(
            "Policy {} created for department {} by {}",
            policy.id, policy.department, actor.user_id
        );
        Ok(policy)
    }

    async fn update_policy(
        &self,
        actor: &Actor,
        policy_id: &str,
        update: PolicyUpdate,
    ) -> Result<Policy> {
        actor.require(&Role::FINANCE_ADMINS, "update policies")?;
        let update = update.normalized()?;
        let mut policy = self.repository.get_by_id(&actor.company_id, policy_id)?;
        update.apply_to(&mut policy);
        debug!("Updating policy {}", policy.id);
        self.repository.update(policy).await
    }

    async fn delete_policy(&self, actor: &Actor, policy_id: &str) -> Result<()> {
        actor.require(&Role::FINANCE_ADMINS, "delete policies")?;
        let deleted = self.repository.delete(&actor.company_id, policy_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("Policy".to_string()));
        }
        info!("Policy {} deleted by {}", policy_id, actor.user_id);
        Ok(())
    }
}
