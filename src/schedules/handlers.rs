// HTTP handlers for the schedules service
// Read-only: the data arrives through the event consumer, not through POSTs.

use axum::{extract::State, routing::get, Json, Router};

use crate::error::ApiError;
use crate::schedules::models::Schedule;
use crate::schedules::repository::ScheduleRepository;

/// Application state for the schedules service
#[derive(Clone)]
pub struct ScheduleState {
    pub repo: ScheduleRepository,
}

/// Build the schedules service router
pub fn router(state: ScheduleState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/schedules-service/schedules", get(list_schedules))
        .with_state(state)
        .layer(cors)
}

/// List all schedule projections consumed so far
/// GET /schedules-service/schedules
async fn list_schedules(
    State(state): State<ScheduleState>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    let schedules = state.repo.list().await?;
    Ok(Json(schedules))
}
