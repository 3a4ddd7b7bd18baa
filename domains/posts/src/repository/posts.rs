//! PostgreSQL post repository

use async_trait::async_trait;
use postboard_common::{PageWindow, Result};
use sqlx::PgPool;
use uuid::Uuid;

use super::PostStore;
use crate::domain::entities::{NewPost, Post, PostUpdate};

/// Columns returned for a post, used for SELECT and RETURNING clauses.
const POST_COLUMNS: &str = "id, title, content, image_path, creator";

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let query = format!(
            "INSERT INTO posts (id, title, content, image_path, creator) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {POST_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Post>(&query)
            .bind(Uuid::new_v4())
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.image_path)
            .bind(post.creator)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn list(&self, window: Option<PageWindow>) -> Result<Vec<Post>> {
        let posts = match window {
            Some(window) => {
                let query = format!(
                    "SELECT {POST_COLUMNS} FROM posts \
                     ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Post>(&query)
                    .bind(window.limit)
                    .bind(window.skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query =
                    format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at ASC, id ASC");
                sqlx::query_as::<_, Post>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(posts)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_owned(&self, id: Uuid, creator: Uuid, update: PostUpdate) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE posts SET title = $3, content = $4, image_path = $5 \
             WHERE id = $1 AND creator = $2",
        )
        .bind(id)
        .bind(creator)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.image_path)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
