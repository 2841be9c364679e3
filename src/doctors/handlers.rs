// HTTP handlers and routing for the doctor service

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    self, authenticate, AuthContext, LoginRequest, RegisterRequest, TokenResponse, TokenService,
};
use crate::doctors::models::DoctorResponse;
use crate::doctors::repository::DoctorRepository;
use crate::error::ApiError;

/// Application state shared across doctor-service handlers
#[derive(Clone)]
pub struct DoctorState {
    pub repo: DoctorRepository,
    pub tokens: Arc<TokenService>,
}

/// Build the doctor service router, with the authentication filter wrapping
/// every route.
pub fn router(state: DoctorState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let auth_ctx = AuthContext::new(state.tokens.clone(), Arc::new(state.repo.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/doctor-service/auth/register", post(register_handler))
        .route("/doctor-service/auth/login", post(login_handler))
        .route("/doctor-service/doctors", get(list_doctors))
        .route("/doctor-service/doctors/:id", get(get_doctor))
        .with_state(state)
        .layer(middleware::from_fn_with_state(auth_ctx, authenticate))
        .layer(cors)
}

/// Register a new doctor account
/// POST /doctor-service/auth/register
async fn register_handler(
    State(state): State<DoctorState>,
    Json(request): Json<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    auth::service::register(&state.repo, &request.email, &request.password, request.role).await?;
    tracing::info!("Registered doctor account for {}", request.email);
    Ok(StatusCode::OK)
}

/// Login a doctor, returning a bearer token
/// POST /doctor-service/auth/login
async fn login_handler(
    State(state): State<DoctorState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;
    let response =
        auth::service::login(&state.repo, &state.tokens, &request.email, &request.password)
            .await?;
    Ok(Json(response))
}

/// List all doctors
/// GET /doctor-service/doctors
async fn list_doctors(
    State(state): State<DoctorState>,
) -> Result<Json<Vec<DoctorResponse>>, ApiError> {
    let doctors = state.repo.list().await?;
    Ok(Json(doctors.into_iter().map(Into::into).collect()))
}

/// Fetch one doctor by ID
/// GET /doctor-service/doctors/:id
async fn get_doctor(
    State(state): State<DoctorState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let doctor = state.repo.find_by_id(id).await?.ok_or(ApiError::NotFound {
        resource: "Doctor".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(doctor.into()))
}
