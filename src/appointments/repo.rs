use anyhow::Context;
use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::PgStore;

#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub scheduled_at: OffsetDateTime,
    pub location: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub title: String,
    pub scheduled_at: OffsetDateTime,
    pub location: String,
    pub notes: Option<String>,
}

#[async_trait]
pub trait AppointmentRepo: Send + Sync {
    /// Ordered by `scheduled_at`, earliest first.
    async fn list_appointments(&self, user_id: Uuid) -> anyhow::Result<Vec<Appointment>>;
    async fn create_appointment(
        &self,
        user_id: Uuid,
        new: NewAppointment,
    ) -> anyhow::Result<Appointment>;
    /// Returns `false` when the appointment does not exist or belongs to someone else.
    async fn delete_appointment(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
impl AppointmentRepo for PgStore {
    async fn list_appointments(&self, user_id: Uuid) -> anyhow::Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, user_id, title, scheduled_at, location, notes, created_at
              FROM appointments
             WHERE user_id = $1
             ORDER BY scheduled_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("list appointments")?;
        Ok(rows)
    }

    async fn create_appointment(
        &self,
        user_id: Uuid,
        new: NewAppointment,
    ) -> anyhow::Result<Appointment> {
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (id, user_id, title, scheduled_at, location, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, scheduled_at, location, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new.title)
        .bind(new.scheduled_at)
        .bind(&new.location)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .context("insert appointment")?;
        Ok(row)
    }

    async fn delete_appointment(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM appointments WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("delete appointment")?;
        Ok(res.rows_affected() > 0)
    }
}
