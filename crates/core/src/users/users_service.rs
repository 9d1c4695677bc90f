use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::users_model::{normalize_email, Actor, NewUser, RegisterUser, Role, User, UserRoleUpdate};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::companies::{Company, CompanyRepositoryTrait, NewCompany};
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::Result;
use crate::Error;

/// Service for registration and user administration
pub struct UserService {
    user_repository: Arc<dyn UserRepositoryTrait>,
    company_repository: Arc<dyn CompanyRepositoryTrait>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepositoryTrait>,
        company_repository: Arc<dyn CompanyRepositoryTrait>,
    ) -> Self {
        Self {
            user_repository,
            company_repository,
        }
    }

    fn required(value: &str, field: &str) -> Result<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::missing_field(field));
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, request: RegisterUser) -> Result<(User, Company)> {
        let name = Self::required(&request.name, "name")?;
        let department = Self::required(&request.department, "department")?;
        let email = normalize_email(&request.email)?;
        if request.password_hash.is_empty() {
            return Err(Error::missing_field("password"));
        }

        if self.user_repository.find_by_email(&email)?.is_some() {
            return Err(Error::Conflict(format!(
                "A user with email '{}' already exists",
                email
            )));
        }

        let (company, role) = match (request.company_name, request.company_id) {
            (Some(company_name), None) => {
                let new_company = NewCompany {
                    name: company_name.trim().to_string(),
                    currency: request
                        .currency
                        .map(|c| c.trim().to_uppercase())
                        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                };
                new_company.validate()?;
                let company = self.company_repository.create(new_company).await?;
                info!("Created company {} ({})", company.name, company.id);
                (company, Role::Admin)
            }
            (None, Some(company_id)) => {
                let company = self.company_repository.get_by_id(company_id.trim())?;
                (company, Role::Employee)
            }
            _ => {
                return Err(Error::invalid_input(
                    "Provide either companyName to create a company or companyId to join one",
                ))
            }
        };

        let user = self
            .user_repository
            .create(NewUser {
                company_id: company.id.clone(),
                name,
                email,
                password_hash: request.password_hash,
                role,
                department,
                manager_id: None,
            })
            .await?;
        info!(
            "Registered user {} as {} in company {}",
            user.id, user.role, company.id
        );
        Ok((user, company))
    }

    fn find_active_by_email(&self, email: &str) -> Result<Option<User>> {
        let Ok(email) = normalize_email(email) else {
            return Ok(None);
        };
        Ok(self
            .user_repository
            .find_by_email(&email)?
            .filter(|user| user.is_active))
    }

    fn find_active_actor(&self, company_id: &str, user_id: &str) -> Result<Option<Actor>> {
        match self.user_repository.get_by_id(company_id, user_id) {
            Ok(user) if user.is_active => Ok(Some(user.actor())),
            Ok(_) | Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn get_user(&self, actor: &Actor, user_id: &str) -> Result<User> {
        if user_id != actor.user_id {
            actor.require(&Role::STAFF, "view other users")?;
        }
        let user = self.user_repository.get_by_id(&actor.company_id, user_id)?;
        if let Some(department) = actor.department_scope() {
            if user.id != actor.user_id && user.department != department {
                return Err(Error::PermissionDenied(
                    "managers can only view users in their own department".to_string(),
                ));
            }
        }
        Ok(user)
    }

    fn list_users(&self, actor: &Actor) -> Result<Vec<User>> {
        actor.require(&Role::STAFF, "list users")?;
        self.user_repository
            .list(&actor.company_id, actor.department_scope())
    }

    async fn update_role(
        &self,
        actor: &Actor,
        user_id: &str,
        mut update: UserRoleUpdate,
    ) -> Result<User> {
        actor.require(&[Role::Admin], "change user roles")?;

        if user_id == actor.user_id {
            if update.role.is_some_and(|role| role != Role::Admin) {
                return Err(Error::InvalidState(
                    "Admins cannot remove their own admin role".to_string(),
                ));
            }
            if update.is_active == Some(false) {
                return Err(Error::InvalidState(
                    "Admins cannot deactivate themselves".to_string(),
                ));
            }
        }

        if let Some(department) = update.department.take() {
            update.department = Some(Self::required(&department, "department")?);
        }
        if let Some(manager_id) = update.manager_id.as_deref() {
            if manager_id == user_id {
                return Err(Error::invalid_input("A user cannot be their own manager"));
            }
            self.user_repository.get_by_id(&actor.company_id, manager_id)?;
        }

        let user = self
            .user_repository
            .update_role(&actor.company_id, user_id, update)
            .await?;
        info!("User {} updated by admin {}", user.id, actor.user_id);
        Ok(user)
    }
}
