// Schedule projection models

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// The schedules service's own copy of a scheduled patient, mapped from the
/// event fields at consumption time. It references nothing in the producer's
/// database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Schedule {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
}
