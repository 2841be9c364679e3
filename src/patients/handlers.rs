// HTTP handlers and routing for the patient service

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
    self, authenticate, AuthContext, AuthenticatedUser, LoginRequest, RegisterRequest,
    TokenResponse, TokenService,
};
use crate::error::ApiError;
use crate::events::{ScheduleEvent, SchedulePublisher};
use crate::patients::models::{PatientResponse, SchedulingRequest};
use crate::patients::repository::PatientRepository;

/// Application state shared across patient-service handlers
#[derive(Clone)]
pub struct PatientState {
    pub repo: PatientRepository,
    pub tokens: Arc<TokenService>,
    pub publisher: SchedulePublisher,
}

/// Build the patient service router.
///
/// The authentication filter wraps every route; only the schedules endpoint
/// actually requires a principal, the rest mirror the original permit-all
/// rules.
pub fn router(state: PatientState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let auth_ctx = AuthContext::new(state.tokens.clone(), Arc::new(state.repo.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/patient-service/auth/register", post(register_handler))
        .route("/patient-service/auth/login", post(login_handler))
        .route("/patient-service/patients", get(list_patients))
        .route(
            "/patient-service/patients/:id",
            get(get_patient).delete(delete_patient),
        )
        .route("/patient-service/schedules", post(create_schedule))
        .with_state(state)
        .layer(middleware::from_fn_with_state(auth_ctx, authenticate))
        .layer(cors)
}

/// Register a new patient account
/// POST /patient-service/auth/register
async fn register_handler(
    State(state): State<PatientState>,
    Json(request): Json<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    auth::service::register(&state.repo, &request.email, &request.password, request.role).await?;
    tracing::info!("Registered patient account for {}", request.email);
    Ok(StatusCode::OK)
}

/// Login a patient, returning a bearer token
/// POST /patient-service/auth/login
async fn login_handler(
    State(state): State<PatientState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;
    let response =
        auth::service::login(&state.repo, &state.tokens, &request.email, &request.password)
            .await?;
    Ok(Json(response))
}

/// List all patients
/// GET /patient-service/patients
async fn list_patients(
    State(state): State<PatientState>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let patients = state.repo.list().await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

/// Fetch one patient by ID
/// GET /patient-service/patients/:id
async fn get_patient(
    State(state): State<PatientState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    let patient = state.repo.find_by_id(id).await?.ok_or(ApiError::NotFound {
        resource: "Patient".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(patient.into()))
}

/// Delete one patient by ID
/// DELETE /patient-service/patients/:id
async fn delete_patient(
    State(state): State<PatientState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "Patient".to_string(),
            id: id.to_string(),
        })
    }
}

/// Create a schedule: persist the patient record, then broadcast the event
/// POST /patient-service/schedules (authenticated)
///
/// The local insert commits before the publish; a broker failure surfaces
/// as an error response but never rolls the insert back. Publish success
/// means "accepted by broker"; consumers process the event at their own
/// pace, possibly after this response has already been sent.
async fn create_schedule(
    State(state): State<PatientState>,
    user: AuthenticatedUser,
    Json(request): Json<SchedulingRequest>,
) -> Result<Json<SchedulingRequest>, ApiError> {
    request.validate()?;

    tracing::debug!(
        "Schedule requested by {} for patient {}",
        user.0.email,
        request.email
    );

    state
        .repo
        .insert_scheduled(&request.name, &request.address, &request.phone, &request.email)
        .await?;

    let event = ScheduleEvent {
        name: request.name.clone(),
        phone: request.phone.clone(),
        address: request.address.clone(),
        email: request.email.clone(),
    };
    state.publisher.publish(&event).await?;

    tracing::info!("Schedule created and broadcast for {}", request.email);
    Ok(Json(request))
}
