// Shared authentication data models and DTOs
// Both user-facing services (patient, doctor) speak these shapes, so the
// login/register contract cannot drift between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Role carried by a stored user and by the resolved principal.
/// Stored as plain text in the database; unknown values fall back to User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Parse a role column value, defaulting to the least-privileged role
    pub fn from_db(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// The authenticated identity attached to a request by the auth filter.
/// Lives only in the request's extensions; never cached across requests.
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
    pub role: Role,
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Login response DTO carrying the issued bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
