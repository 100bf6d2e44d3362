use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::pagination::PageWindow;
use crate::users::repo_types::{User, UserFields};

const USER_COLUMNS: &str =
    "id, created_at, updated_at, deleted_at, name, state, phone, email, address";

/// Storage operations behind the `/user` handlers.
///
/// Every read skips soft-deleted rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user; identifier and timestamps are assigned here.
    async fn insert(&self, fields: UserFields) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// Mark the row deleted. Existence is checked by the caller.
    async fn soft_delete(&self, user: &User) -> anyhow::Result<()>;
    /// Overwrite the business fields. Last write wins.
    async fn update_by_id(&self, id: i64, fields: &UserFields) -> anyhow::Result<Option<User>>;
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<User>>;
    /// Returns the requested window plus the count of all live rows.
    async fn find_paged(&self, window: PageWindow) -> anyhow::Result<(Vec<User>, i64)>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, fields: UserFields) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, state, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&fields.state)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.address)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn soft_delete(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.id)
        .execute(&self.db)
        .await
        .context("soft delete user")?;
        Ok(())
    }

    async fn update_by_id(&self, id: i64, fields: &UserFields) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2, state = $3, phone = $4, email = $5, address = $6,
                   updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.state)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.address)
        .fetch_optional(&self.db)
        .await
        .context("update user")?;
        Ok(user)
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE name = $1 AND deleted_at IS NULL
            ORDER BY id
            "#
        ))
        .bind(name)
        .fetch_all(&self.db)
        .await
        .context("find users by name")?;
        Ok(rows)
    }

    async fn find_paged(&self, window: PageWindow) -> anyhow::Result<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.db)
            .await
            .context("count users")?;

        // NULL limit/offset behave like LIMIT ALL / no OFFSET.
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(&self.db)
        .await
        .context("list users")?;

        Ok((rows, total))
    }
}
