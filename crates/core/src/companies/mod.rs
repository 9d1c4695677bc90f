//! Companies module - tenant records.

mod companies_model;
mod companies_service;
mod companies_traits;

pub(crate) use companies_model::validate_currency;
pub use companies_model::{Company, CompanyUpdate, NewCompany};
pub use companies_service::CompanyService;
pub use companies_traits::{CompanyRepositoryTrait, CompanyServiceTrait};
