// Shared authentication module
// One implementation of token issuance/validation and the request filter,
// used by every service so the protocol cannot drift between processes.

pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use middleware::{authenticate, AuthContext, AuthenticatedUser, UserDirectory};
pub use models::{LoginRequest, Principal, RegisterRequest, Role, TokenResponse};
pub use password::PasswordService;
pub use service::CredentialStore;
pub use token::{TokenService, TOKEN_ISSUER};
