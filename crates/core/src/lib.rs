//! Spendwise Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the expense platform: policy
//! compliance, approvals, budget tracking, vendor statistics, analytics and
//! report rendering. It is database-agnostic and defines repository traits
//! that are implemented by the `storage-sqlite` crate.

pub mod analytics;
pub mod budgets;
pub mod companies;
pub mod constants;
pub mod errors;
pub mod events;
pub mod expenses;
pub mod policies;
pub mod reports;
pub mod users;
pub mod vendors;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

#[cfg(test)]
pub(crate) mod test_support;
