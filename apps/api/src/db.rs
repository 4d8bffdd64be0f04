use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Idempotent schema for the claims table and its id sequence.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS claims (
        id                   TEXT PRIMARY KEY,
        first_name           TEXT NOT NULL,
        last_name            TEXT NOT NULL,
        submitted_at         TIMESTAMPTZ NOT NULL,
        step                 SMALLINT NOT NULL CHECK (step BETWEEN 0 AND 3),
        estimated_completion TEXT NOT NULL,
        week                 TEXT NOT NULL,
        notifications        JSONB NOT NULL DEFAULT '[]'::jsonb,
        work_log             JSONB NOT NULL DEFAULT '[]'::jsonb
    )
    "#,
    "CREATE SEQUENCE IF NOT EXISTS claim_number_seq START WITH 1000",
    "CREATE INDEX IF NOT EXISTS claims_submitted_at_idx ON claims (submitted_at DESC)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the claims schema if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply claims schema")?;
    }
    info!("Claims schema ready");
    Ok(())
}
