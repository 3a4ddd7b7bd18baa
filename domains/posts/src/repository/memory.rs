//! In-memory post store
//!
//! Keeps posts in insertion order behind an async lock. Used by tests and by
//! local runs without a database.

use async_trait::async_trait;
use postboard_common::{PageWindow, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::PostStore;
use crate::domain::entities::{NewPost, Post, PostUpdate};

#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let created = Post::from_new(Uuid::new_v4(), post);
        self.posts.write().await.push(created.clone());
        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, window: Option<PageWindow>) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let listed = match window {
            Some(window) => posts
                .iter()
                .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(0))
                .cloned()
                .collect(),
            None => posts.clone(),
        };
        Ok(listed)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.posts.read().await.len() as i64)
    }

    async fn update_owned(&self, id: Uuid, creator: Uuid, update: PostUpdate) -> Result<u64> {
        let mut posts = self.posts.write().await;
        match posts
            .iter_mut()
            .find(|p| p.id == id && p.creator == creator)
        {
            Some(post) => {
                post.apply(update);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok((before - posts.len()) as u64)
    }
}
