use async_trait::async_trait;

use super::companies_model::{Company, CompanyUpdate, NewCompany};
use crate::errors::Result;
use crate::users::Actor;

/// Trait for company repository operations
#[async_trait]
pub trait CompanyRepositoryTrait: Send + Sync {
    fn get_by_id(&self, company_id: &str) -> Result<Company>;
    async fn create(&self, new_company: NewCompany) -> Result<Company>;
    async fn update(&self, company_id: &str, update: CompanyUpdate) -> Result<Company>;
}

/// Trait for company service operations
#[async_trait]
pub trait CompanyServiceTrait: Send + Sync {
    fn get_company(&self, actor: &Actor) -> Result<Company>;
    async fn update_company(&self, actor: &Actor, update: CompanyUpdate) -> Result<Company>;
}
