// Doctor data models and DTOs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Doctor database row. Registration only fills email/password/role;
/// the professional fields are populated by back-office tooling.
#[derive(Debug, Clone, FromRow)]
pub struct Doctor {
    pub id: Uuid,
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub crm: Option<String>,
    pub clinic: Option<String>,
    pub email: String,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Doctor response model (excludes the password hash)
#[derive(Debug, Clone, Serialize)]
pub struct DoctorResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub crm: Option<String>,
    pub clinic: Option<String>,
    pub email: String,
    pub role: Option<String>,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            specialty: doctor.specialty,
            crm: doctor.crm,
            clinic: doctor.clinic,
            email: doctor.email,
            role: doctor.role,
        }
    }
}
