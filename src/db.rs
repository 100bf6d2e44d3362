use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::PoolConfig;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        deleted_at  TIMESTAMPTZ NULL,
        name        VARCHAR(20)  NOT NULL,
        state       VARCHAR(20)  NOT NULL,
        phone       VARCHAR(20)  NOT NULL,
        email       VARCHAR(40)  NOT NULL,
        address     VARCHAR(200) NOT NULL
    )
"#;

const CREATE_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_deleted_at ON users (deleted_at)";

/// Open the shared pool. Fails if the first connection cannot be made.
pub async fn connect(database_url: &str, cfg: &PoolConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .idle_timeout(cfg.idle_timeout)
        .max_lifetime(cfg.max_lifetime)
        .connect(database_url)
        .await
        .context("connect to database")
}

/// Create the users table if it does not exist yet.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query(CREATE_USERS_TABLE)
        .execute(db)
        .await
        .context("create users table")?;
    sqlx::query(CREATE_DELETED_AT_INDEX)
        .execute(db)
        .await
        .context("create users.deleted_at index")?;
    Ok(())
}
