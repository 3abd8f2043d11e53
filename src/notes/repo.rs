use anyhow::Context;
use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::PgStore;

/// Free text attached to one gestational week; at most one per (user, week).
#[derive(Debug, Clone, FromRow)]
pub struct WeekNote {
    pub user_id: Uuid,
    pub week: i16,
    pub content: String,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait NoteRepo: Send + Sync {
    /// Ordered by week.
    async fn list_notes(&self, user_id: Uuid) -> anyhow::Result<Vec<WeekNote>>;
    async fn upsert_note(&self, user_id: Uuid, week: i16, content: &str)
        -> anyhow::Result<WeekNote>;
}

#[async_trait]
impl NoteRepo for PgStore {
    async fn list_notes(&self, user_id: Uuid) -> anyhow::Result<Vec<WeekNote>> {
        let rows = sqlx::query_as::<_, WeekNote>(
            r#"
            SELECT user_id, week, content, updated_at
              FROM week_notes
             WHERE user_id = $1
             ORDER BY week ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("list notes")?;
        Ok(rows)
    }

    async fn upsert_note(
        &self,
        user_id: Uuid,
        week: i16,
        content: &str,
    ) -> anyhow::Result<WeekNote> {
        let row = sqlx::query_as::<_, WeekNote>(
            r#"
            INSERT INTO week_notes (user_id, week, content)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, week)
            DO UPDATE SET content = EXCLUDED.content, updated_at = now()
            RETURNING user_id, week, content, updated_at
            "#,
        )
        .bind(user_id)
        .bind(week)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .context("upsert note")?;
        Ok(row)
    }
}
