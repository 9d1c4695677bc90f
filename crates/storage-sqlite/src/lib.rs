//! SQLite storage implementation for Spendwise.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `spendwise-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for every tenant-scoped entity
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//!
//! ```text
//!      server (HTTP)
//!            │
//!            ▼
//!      core (domain)
//!            │  repository traits
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```
//!
//! Every query is filtered by `company_id`, so a record of another tenant
//! behaves exactly like a missing one.

pub mod db;
pub mod errors;
pub mod schema;
pub(crate) mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Repository implementations
pub mod budgets;
pub mod companies;
pub mod expenses;
pub mod policies;
pub mod users;
pub mod vendors;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use budgets::BudgetRepository;
pub use companies::CompanyRepository;
pub use expenses::ExpenseRepository;
pub use policies::PolicyRepository;
pub use users::UserRepository;
pub use vendors::VendorRepository;

// Re-export from spendwise-core for convenience
pub use spendwise_core::errors::{DatabaseError, Error, Result};
