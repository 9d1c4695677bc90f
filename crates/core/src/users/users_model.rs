//! User domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::Error;

/// Role of a user inside their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Finance,
    Executive,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Employee,
        Role::Manager,
        Role::Finance,
        Role::Executive,
        Role::Admin,
    ];

    /// Roles allowed to approve or reject expenses.
    pub const REVIEWERS: [Role; 3] = [Role::Manager, Role::Finance, Role::Admin];

    /// Roles allowed to create and edit policies and budgets.
    pub const FINANCE_ADMINS: [Role; 2] = [Role::Finance, Role::Admin];

    /// Every role above employee.
    pub const STAFF: [Role; 4] = [Role::Manager, Role::Finance, Role::Executive, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Finance => "finance",
            Role::Executive => "executive",
            Role::Admin => "admin",
        }
    }

    pub fn is_reviewer(&self) -> bool {
        Self::REVIEWERS.contains(self)
    }

    /// Finance, executives and admins see the whole company; managers only
    /// their department; employees only themselves.
    pub fn sees_whole_company(&self) -> bool {
        matches!(self, Role::Finance | Role::Executive | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_input(format!("Unknown role '{}'", s)))
    }
}

/// Domain model for a user
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub department: String,
    pub manager_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id.clone(),
            company_id: self.company_id.clone(),
            role: self.role,
            department: self.department.clone(),
        }
    }
}

/// Input model for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub company_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub department: String,
    pub manager_id: Option<String>,
}

/// Registration request. Exactly one of `company_name` (create a new company
/// and become its admin) or `company_id` (join as an employee) must be set.
/// The password is hashed by the caller before it reaches the domain.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub department: String,
    pub company_name: Option<String>,
    pub company_id: Option<String>,
    pub currency: Option<String>,
}

/// Admin update of a user's role and/or department.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleUpdate {
    pub role: Option<Role>,
    pub department: Option<String>,
    pub manager_id: Option<String>,
    pub is_active: Option<bool>,
}

/// The authenticated principal a request runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub company_id: String,
    pub role: Role,
    pub department: String,
}

impl Actor {
    /// Fails with `PermissionDenied` unless the actor has one of `allowed`.
    pub fn require(&self, allowed: &[Role], action: &str) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "role '{}' cannot {}",
                self.role, action
            )))
        }
    }

    /// Department filter implied by the actor's role: `None` for company-wide
    /// roles, the actor's own department otherwise.
    pub fn department_scope(&self) -> Option<&str> {
        if self.role.sees_whole_company() {
            None
        } else {
            Some(self.department.as_str())
        }
    }
}

/// Lower-cases and trims an email address and checks its basic shape.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(Error::invalid_input(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email)
}
