//! SQLite storage implementation for expense policies.

mod model;
mod repository;

pub use model::PolicyDB;
pub use repository::PolicyRepository;
