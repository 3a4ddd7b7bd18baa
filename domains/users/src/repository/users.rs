//! PostgreSQL user repository

use async_trait::async_trait;
use postboard_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::domain::entities::{NewUser, User};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, password_hash",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
