use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::Post;
use crate::db::StoreError;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Inserts title, body and user id; the given `id` is ignored.
    async fn create(&self, post: &Post) -> Result<Post, StoreError>;
    async fn find(&self, id: i32) -> Result<Option<Post>, StoreError>;
    /// All posts, newest id first.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;
    async fn update(&self, post: &Post) -> Result<u64, StoreError>;
    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgPostStore {
    db: PgPool,
}

impl PgPostStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, post: &Post) -> Result<Post, StoreError> {
        let row = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, body, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, body, user_id
            "#,
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: i32) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, Post>(
            "SELECT id, title, body, user_id FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, Post>(
            "SELECT id, title, body, user_id FROM posts ORDER BY id DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, post: &Post) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE posts SET title = $1, body = $2, user_id = $3 WHERE id = $4",
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.user_id)
        .bind(post.id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
