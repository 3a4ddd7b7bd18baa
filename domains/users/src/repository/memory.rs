//! In-memory user store

use async_trait::async_trait;
use postboard_common::{RepositoryError, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserStore;
use crate::domain::entities::{NewUser, User};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists.into());
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
