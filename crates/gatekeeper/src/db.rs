//! Post storage.
//!
//! The `posts` and `profiles` tables belong to the hosted backend; this
//! service only reads counts and appends posts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A stored post as listed to clients.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Append a post. `body` is already trimmed and non-empty.
    async fn insert_post(&self, body: &str, author_id: Uuid) -> Result<(), sqlx::Error>;

    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<PostRow>, sqlx::Error>;

    /// Round-trip to the database.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn insert_post(&self, body: &str, author_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO posts (body, author_id) VALUES ($1, $2)")
            .bind(body)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, body, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
