// Patient data models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Patient database row.
///
/// The table holds two shapes of row, mirroring how records are created:
/// registration writes email/password/role, the schedules endpoint writes
/// demographics only. Hence most columns are nullable.
#[derive(Debug, Clone, FromRow)]
pub struct Patient {
    pub id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Patient response model (excludes the password hash)
#[derive(Debug, Clone, Serialize)]
pub struct PatientResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub role: Option<String>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            address: patient.address,
            phone: patient.phone,
            email: patient.email,
            role: patient.role,
        }
    }
}

/// Payload of the create-schedule endpoint, echoed back verbatim on
/// success. Carries exactly the fields that go out on the wire as a
/// schedule event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SchedulingRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(email)]
    pub email: String,
}
