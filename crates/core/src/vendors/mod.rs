//! Vendors module - approved-spend statistics per vendor.

mod vendors_model;
mod vendors_service;
mod vendors_traits;


pub use vendors_model::{BlacklistAttempt, Vendor, VendorAnalytics, VendorStats};
pub use vendors_service::VendorService;
pub use vendors_traits::{VendorRepositoryTrait, VendorServiceTrait};
