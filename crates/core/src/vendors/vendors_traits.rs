use async_trait::async_trait;

use super::vendors_model::{Vendor, VendorAnalytics};
use crate::errors::Result;
use crate::users::Actor;

/// Trait for vendor repository operations
#[async_trait]
pub trait VendorRepositoryTrait: Send + Sync {
    fn list(&self, company_id: &str) -> Result<Vec<Vendor>>;
    /// Rebuilds the stats row of `vendor` from its approved expenses in one
    /// transaction. Vendor names match ignoring ASCII case.
    async fn refresh(&self, company_id: &str, vendor: &str) -> Result<Vendor>;
}

/// Trait for vendor service operations
#[async_trait]
pub trait VendorServiceTrait: Send + Sync {
    /// Vendors sorted by total spend, highest first.
    fn list_vendors(&self, actor: &Actor) -> Result<Vec<Vendor>>;
    fn vendor_analytics(&self, actor: &Actor) -> Result<VendorAnalytics>;
    /// Recomputes one vendor's stats from its approved expenses.
    async fn refresh_vendor(&self, company_id: &str, vendor: &str) -> Result<Vendor>;
}
