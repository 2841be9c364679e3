// Service-agnostic login and registration flows
//
// The patient and doctor services both authenticate against their own user
// table; the flow itself (credential check, hashing, token issuance) is
// identical and lives here once.

use crate::auth::{
    error::AuthError,
    models::{Role, TokenResponse},
    password::PasswordService,
    token::TokenService,
};
use axum::async_trait;

/// Credential storage seam implemented by each service's repository
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Password hash for the account with this email, if one exists
    async fn find_password_hash(&self, email: &str) -> Result<Option<String>, AuthError>;
    /// Create an account with already-hashed credentials
    async fn insert_credentials(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<(), AuthError>;
}

/// Verify credentials and issue a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    store: &dyn CredentialStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<TokenResponse, AuthError> {
    let hash = store
        .find_password_hash(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !PasswordService::verify_password(password, &hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = tokens.issue(email)?;
    Ok(TokenResponse { token })
}

/// Register a new account with a hashed password
pub async fn register(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
    role: Role,
) -> Result<(), AuthError> {
    if store.find_password_hash(email).await?.is_some() {
        return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = PasswordService::hash_password(password)?;
    store.insert_credentials(email, &password_hash, role).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        accounts: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn find_password_hash(&self, email: &str) -> Result<Option<String>, AuthError> {
            Ok(self.accounts.lock().unwrap().get(email).cloned())
        }

        async fn insert_credentials(
            &self,
            email: &str,
            password_hash: &str,
            _role: Role,
        ) -> Result<(), AuthError> {
            self.accounts
                .lock()
                .unwrap()
                .insert(email.to_string(), password_hash.to_string());
            Ok(())
        }
    }

    fn test_tokens() -> TokenService {
        TokenService::new("auth-service-test-secret".to_string())
    }

    #[tokio::test]
    async fn register_then_login_issues_validating_token() {
        let store = MemoryStore::default();
        let tokens = test_tokens();

        register(&store, "jane@example.com", "long-enough-pw", Role::User)
            .await
            .unwrap();
        let response = login(&store, &tokens, "jane@example.com", "long-enough-pw")
            .await
            .unwrap();

        assert_eq!(
            tokens.validate(&response.token),
            Some("jane@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let store = MemoryStore::default();
        let tokens = test_tokens();

        register(&store, "jane@example.com", "long-enough-pw", Role::User)
            .await
            .unwrap();
        let result = login(&store, &tokens, "jane@example.com", "wrong-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_rejected() {
        let store = MemoryStore::default();
        let tokens = test_tokens();

        let result = login(&store, &tokens, "ghost@example.com", "whatever").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let store = MemoryStore::default();

        register(&store, "jane@example.com", "long-enough-pw", Role::User)
            .await
            .unwrap();
        let result = register(&store, "jane@example.com", "other-password", Role::User).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
    }
}
