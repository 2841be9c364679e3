// Database repository for the schedules service

use uuid::Uuid;

use crate::db::DbPool;
use crate::events::ScheduleEvent;
use crate::schedules::models::Schedule;

/// Schedule repository for database operations
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: DbPool,
}

impl ScheduleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a projection row for a consumed event.
    ///
    /// Deliberately no dedup key: at-least-once delivery means a redelivered
    /// event inserts a second row. Each insert gets its own id.
    pub async fn insert_from_event(&self, event: &ScheduleEvent) -> Result<Schedule, sqlx::Error> {
        sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO tb_schedules (id, name, phone, address, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, phone, address, email
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.name)
        .bind(&event.phone)
        .bind(&event.address)
        .bind(&event.email)
        .fetch_one(&self.pool)
        .await
    }

    /// List all stored schedules
    pub async fn list(&self) -> Result<Vec<Schedule>, sqlx::Error> {
        sqlx::query_as::<_, Schedule>(
            "SELECT id, name, phone, address, email FROM tb_schedules ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await
    }
}
