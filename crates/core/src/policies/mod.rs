//! Policies module - per-department spending rules and the compliance check.

pub mod compliance;
mod policies_model;
mod policies_service;
mod policies_traits;

#[cfg(test)]
mod policies_service_tests;

pub use compliance::{evaluate, ComplianceInput, ComplianceOutcome};
pub use policies_model::{NewPolicy, Policy, PolicyUpdate};
pub use policies_service::PolicyService;
pub use policies_traits::{PolicyRepositoryTrait, PolicyServiceTrait};
