// Database repository for the doctor service

use axum::async_trait;
use uuid::Uuid;

use crate::auth::{AuthError, CredentialStore, Principal, Role, UserDirectory};
use crate::db::DbPool;
use crate::doctors::models::Doctor;

const DOCTOR_COLUMNS: &str = "id, name, specialty, crm, clinic, email, password, role";

/// Doctor repository for database operations
#[derive(Clone)]
pub struct DoctorRepository {
    pool: DbPool,
}

impl DoctorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find a doctor by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, sqlx::Error> {
        sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {} FROM tb_doctor WHERE LOWER(email) = LOWER($1)",
            DOCTOR_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a doctor by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, sqlx::Error> {
        sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {} FROM tb_doctor WHERE id = $1",
            DOCTOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all doctors
    pub async fn list(&self) -> Result<Vec<Doctor>, sqlx::Error> {
        sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {} FROM tb_doctor ORDER BY email",
            DOCTOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl CredentialStore for DoctorRepository {
    async fn find_password_hash(&self, email: &str) -> Result<Option<String>, AuthError> {
        let doctor = self
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(doctor.and_then(|d| d.password))
    }

    async fn insert_credentials(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO tb_doctor (id, email, password, role) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(password_hash)
            .bind(role.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for DoctorRepository {
    async fn find_principal(&self, email: &str) -> Result<Option<Principal>, AuthError> {
        let doctor = self
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(doctor.map(|d| Principal {
            email: d.email,
            role: d.role.as_deref().map(Role::from_db).unwrap_or_default(),
        }))
    }
}
