//! Company (tenant) domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::Error;

/// Domain model for a company. Every other record is scoped to one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a company
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    pub currency: String,
}

/// Input model for updating a company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub currency: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::missing_field("companyName"));
        }
        validate_currency(&self.currency)
    }
}

/// Currencies are stored as three-letter upper-case ISO codes.
pub(crate) fn validate_currency(currency: &str) -> Result<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(Error::invalid_input(format!(
            "Currency '{}' must be a three-letter ISO code",
            currency
        )));
    }
    Ok(())
}
