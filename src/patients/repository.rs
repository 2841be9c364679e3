// Database repository for the patient service

use axum::async_trait;
use uuid::Uuid;

use crate::auth::{AuthError, CredentialStore, Principal, Role, UserDirectory};
use crate::db::DbPool;
use crate::patients::models::Patient;

/// Patient repository for database operations
#[derive(Clone)]
pub struct PatientRepository {
    pool: DbPool,
}

impl PatientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find a patient by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, sqlx::Error> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, address, phone, email, password, role FROM tb_patient WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find the credential row for an email, skipping the password-less
    /// demographic rows the schedules endpoint writes for the same email.
    /// Login and principal resolution must see the credential row no matter
    /// how many schedule rows exist.
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Patient>, sqlx::Error> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, address, phone, email, password, role FROM tb_patient WHERE LOWER(email) = LOWER($1) AND password IS NOT NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a patient by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, sqlx::Error> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, address, phone, email, password, role FROM tb_patient WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all patients
    pub async fn list(&self) -> Result<Vec<Patient>, sqlx::Error> {
        sqlx::query_as::<_, Patient>(
            "SELECT id, name, address, phone, email, password, role FROM tb_patient ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a patient by ID, reporting whether a row existed
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tb_patient WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert the demographic record created by the schedules endpoint.
    /// No credentials: this row exists because a schedule was made.
    pub async fn insert_scheduled(
        &self,
        name: &str,
        address: &str,
        phone: &str,
        email: &str,
    ) -> Result<Patient, sqlx::Error> {
        sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO tb_patient (id, name, address, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, phone, email, password, role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }
}

#[async_trait]
impl CredentialStore for PatientRepository {
    async fn find_password_hash(&self, email: &str) -> Result<Option<String>, AuthError> {
        let patient = self
            .find_credentials_by_email(email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(patient.and_then(|p| p.password))
    }

    async fn insert_credentials(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO tb_patient (id, email, password, role) VALUES ($1, $2, $3, $4)")
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
impl UserDirectory for PatientRepository {
    async fn find_principal(&self, email: &str) -> Result<Option<Principal>, AuthError> {
        let patient = self
            .find_credentials_by_email(email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(patient.map(|p| Principal {
            email: p.email,
            role: p.role.as_deref().map(Role::from_db).unwrap_or_default(),
        }))
    }
}
