use anyhow::Context;
use async_trait::async_trait;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::PgStore;

/// One pregnancy per user; keyed by `user_id`.
#[derive(Debug, Clone, FromRow)]
pub struct PregnancyRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait PregnancyRepo: Send + Sync {
    async fn find_pregnancy(&self, user_id: Uuid) -> anyhow::Result<Option<PregnancyRecord>>;
    /// Creates the user's record or moves its start date; never duplicates.
    async fn upsert_pregnancy(&self, user_id: Uuid, start_date: Date)
        -> anyhow::Result<PregnancyRecord>;
}

#[async_trait]
impl PregnancyRepo for PgStore {
    async fn find_pregnancy(&self, user_id: Uuid) -> anyhow::Result<Option<PregnancyRecord>> {
        let row = sqlx::query_as::<_, PregnancyRecord>(
            r#"
            SELECT id, user_id, start_date, created_at, updated_at
            FROM pregnancies
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("find pregnancy")?;
        Ok(row)
    }

    async fn upsert_pregnancy(
        &self,
        user_id: Uuid,
        start_date: Date,
    ) -> anyhow::Result<PregnancyRecord> {
        let row = sqlx::query_as::<_, PregnancyRecord>(
            r#"
            INSERT INTO pregnancies (id, user_id, start_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET start_date = EXCLUDED.start_date, updated_at = now()
            RETURNING id, user_id, start_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(start_date)
        .fetch_one(&self.pool)
        .await
        .context("upsert pregnancy")?;
        Ok(row)
    }
}
