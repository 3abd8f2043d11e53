use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    appointments::repo::AppointmentRepo, auth::repo::UserRepo, notes::repo::NoteRepo,
    pregnancy::repo::PregnancyRepo,
};

/// Everything handlers need from persistence. Held as `Arc<dyn Store>` in
/// the application state.
#[async_trait]
pub trait Store: UserRepo + PregnancyRepo + AppointmentRepo + NoteRepo {
    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Postgres-backed store over a pooled connection.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("database ping")?;
        Ok(())
    }
}
