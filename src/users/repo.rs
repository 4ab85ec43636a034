use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User};
use crate::db::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Rows whose username or email collides with the given ones, ignoring `exclude_id`.
    async fn count_taken(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<i64, StoreError>;
    async fn create(&self, user: &NewUser) -> Result<User, StoreError>;
    async fn find(&self, id: i32) -> Result<Option<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    /// Returns the number of rows affected.
    async fn update(&self, id: i32, user: &NewUser) -> Result<u64, StoreError>;
    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn count_taken(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE (username = $1 OR email = $2)
              AND ($3::INT IS NULL OR id <> $3)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: i32) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_active, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, user: &NewUser) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET username = $1, email = $2, password_hash = $3, is_active = $4, updated_at = now()
             WHERE id = $5
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
