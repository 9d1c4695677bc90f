use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::companies_model::{validate_currency, Company, CompanyUpdate};
use super::companies_traits::{CompanyRepositoryTrait, CompanyServiceTrait};
use crate::errors::Result;
use crate::users::{Actor, Role};
use crate::Error;

pub struct CompanyService {
    repository: Arc<dyn CompanyRepositoryTrait>,
}

impl CompanyService {
    pub fn new(repository: Arc<dyn CompanyRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CompanyServiceTrait for CompanyService {
    fn get_company(&self, actor: &Actor) -> Result<Company> {
        self.repository.get_by_id(&actor.company_id)
    }

    async fn update_company(&self, actor: &Actor, mut update: CompanyUpdate) -> Result<Company> {
        actor.require(&[Role::Admin], "update company settings")?;

        if let Some(name) = update.name.as_deref() {
            if name.trim().is_empty() {
                return Err(Error::invalid_input("Company name cannot be empty"));
            }
        }
        if let Some(currency) = update.currency.take() {
            let currency = currency.trim().to_uppercase();
            validate_currency(&currency)?;
            update.currency = Some(currency);
        }

        debug!("Updating company {}", actor.company_id);
        self.repository.update(&actor.company_id, update).await
    }
}
