//! SQLite storage implementation for vendor statistics.

mod model;
mod repository;

pub use model::VendorDB;
pub use repository::VendorRepository;
