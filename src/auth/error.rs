// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Authentication and authorization error types
///
/// Note the deliberate asymmetry: a token that fails validation is never an
/// error (the filter just leaves the request unauthenticated), while a
/// failure to *sign* a token on login is unexpected and fatal.
#[derive(Debug)]
pub enum AuthError {
    /// Login with an unknown email or a wrong password
    InvalidCredentials,
    /// Protected route reached without an authenticated principal
    MissingAuthentication,
    /// Registration attempted with an email that already has an account
    EmailAlreadyExists,
    /// Signing the token failed (bad key material, serialization failure)
    TokenCreationError(String),
    /// Password hashing or verification failed internally
    PasswordHashError,
    /// Database failure during a lookup on the auth path
    DatabaseError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::MissingAuthentication => write!(f, "Missing authentication"),
            AuthError::EmailAlreadyExists => write!(f, "Email already exists"),
            AuthError::TokenCreationError(msg) => write!(f, "Token creation error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
            }
            AuthError::MissingAuthentication => {
                warn!("Unauthenticated request to protected route");
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            AuthError::EmailAlreadyExists => {
                (StatusCode::BAD_REQUEST, "Email already exists".to_string())
            }
            AuthError::TokenCreationError(msg) => {
                error!("Token creation failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
