//! Users module - accounts, roles and the authenticated actor.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{normalize_email, Actor, NewUser, RegisterUser, Role, User, UserRoleUpdate};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
