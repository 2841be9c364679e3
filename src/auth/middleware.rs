// Per-request authentication filter
//
// The filter never terminates a request. It extracts a bearer token if one
// is present, validates it, resolves the principal against the owning
// service's user store, and attaches the principal to the request's
// extensions. Whether an unauthenticated request is acceptable is decided
// downstream by the route (via the `AuthenticatedUser` extractor), not here.
//
// Request extensions are scoped to the single request, so no authentication
// state can leak across pooled worker tasks.

use crate::auth::{error::AuthError, models::Principal, token::TokenService};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Lookup seam between the shared filter and each service's user store.
/// The patient service resolves principals against patients, the doctor
/// service against doctors.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_principal(&self, email: &str) -> Result<Option<Principal>, AuthError>;
}

/// State handed to the filter: the token verifier plus the owning
/// service's user directory
#[derive(Clone)]
pub struct AuthContext {
    pub tokens: Arc<TokenService>,
    pub directory: Arc<dyn UserDirectory>,
}

impl AuthContext {
    pub fn new(tokens: Arc<TokenService>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { tokens, directory }
    }
}

/// Extract the credential from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The authentication filter, applied with `middleware::from_fn_with_state`.
///
/// Runs once per inbound request before route handling. A missing header,
/// an invalid token or an unknown subject all leave the request
/// unauthenticated and forward it unchanged.
pub async fn authenticate(
    State(ctx): State<AuthContext>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        if let Some(email) = ctx.tokens.validate(token) {
            match ctx.directory.find_principal(&email).await {
                Ok(Some(principal)) => {
                    debug!("Authenticated request for {}", principal.email);
                    request.extensions_mut().insert(principal);
                }
                Ok(None) => {
                    // Valid token but the subject no longer exists here
                    debug!("Token subject {} not found in user store", email);
                }
                Err(e) => {
                    // Lookup failure degrades to unauthenticated rather than
                    // failing the whole request
                    warn!("Principal lookup failed during authentication: {}", e);
                }
            }
        }
    }
    next.run(request).await
}

/// Route-level guard: extracts the principal attached by the filter,
/// rejecting with 401 when the request is unauthenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AuthError::MissingAuthentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum::{middleware, routing::get, Extension, Json, Router};
    use axum_test::TestServer;
    use serde_json::json;

    fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
    }

    /// In-memory directory with a single known user
    struct SingleUserDirectory {
        email: String,
    }

    #[async_trait]
    impl UserDirectory for SingleUserDirectory {
        async fn find_principal(&self, email: &str) -> Result<Option<Principal>, AuthError> {
            if email == self.email {
                Ok(Some(Principal {
                    email: email.to_string(),
                    role: Role::User,
                }))
            } else {
                Ok(None)
            }
        }
    }

    async fn public_route(principal: Option<Extension<Principal>>) -> Json<serde_json::Value> {
        Json(json!({
            "authenticated": principal.is_some(),
        }))
    }

    async fn protected_route(user: AuthenticatedUser) -> String {
        user.0.email
    }

    fn test_server(secret: &str) -> (TestServer, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(secret.to_string()));
        let directory = Arc::new(SingleUserDirectory {
            email: "jane@example.com".to_string(),
        });
        let ctx = AuthContext::new(tokens.clone(), directory);

        let app = Router::new()
            .route("/public", get(public_route))
            .route("/protected", get(protected_route))
            .layer(middleware::from_fn_with_state(ctx, authenticate));

        (TestServer::new(app).unwrap(), tokens)
    }

    #[tokio::test]
    async fn request_without_header_passes_filter_unauthenticated() {
        let (server, _) = test_server("filter-test-secret");

        let response = server.get("/public").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn protected_route_rejects_unauthenticated_request() {
        let (server, _) = test_server("filter-test-secret");

        let response = server.get("/protected").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_attaches_principal() {
        let (server, tokens) = test_server("filter-test-secret");
        let token = tokens.issue("jane@example.com").unwrap();

        let (name, value) = bearer(&token);
        let response = server.get("/protected").add_header(name, value).await;
        response.assert_status_ok();
        response.assert_text("jane@example.com");
    }

    #[tokio::test]
    async fn invalid_token_does_not_short_circuit_public_routes() {
        let (server, _) = test_server("filter-test-secret");

        let (name, value) = bearer("not.a.token");
        let response = server.get("/public").add_header(name, value).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn token_for_unknown_subject_leaves_request_unauthenticated() {
        let (server, tokens) = test_server("filter-test-secret");
        let token = tokens.issue("nobody@example.com").unwrap();

        let (name, value) = bearer(&token);
        let response = server.get("/protected").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_signed_elsewhere_is_ignored() {
        let (server, _) = test_server("filter-test-secret");
        let foreign = TokenService::new("some-other-secret".to_string());
        let token = foreign.issue("jane@example.com").unwrap();

        let (name, value) = bearer(&token);
        let response = server.get("/protected").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
