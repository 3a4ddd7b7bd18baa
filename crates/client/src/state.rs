//! Cached post list with a change feed
//!
//! Observers subscribed at publish time receive each update; late
//! subscribers get nothing until the next publish. Dropping a
//! `Subscription` unsubscribes it.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::models::{Post, PostsUpdate};

/// Updates buffered per subscriber before the slowest one starts skipping
const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct PostsState {
    posts: Arc<RwLock<Vec<Post>>>,
    updates: broadcast::Sender<PostsUpdate>,
}

impl Default for PostsState {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PostsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity.max(1));
        Self {
            posts: Arc::new(RwLock::new(Vec::new())),
            updates,
        }
    }

    /// Copy of the cached posts
    pub async fn snapshot(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.updates.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }

    /// Replace the cache and publish the new list to current subscribers
    pub async fn replace(&self, update: PostsUpdate) {
        *self.posts.write().await = update.posts.clone();

        // No subscribers is not an error
        let delivered = self.updates.send(update).unwrap_or(0);
        tracing::debug!(subscribers = delivered, "Published post list update");
    }
}

/// A live subscription to post list updates
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<PostsUpdate>,
}

impl Subscription {
    /// Next update. A lagging subscriber skips to the oldest retained value.
    /// Returns `None` once the state has been dropped.
    pub async fn recv(&mut self) -> Option<PostsUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Subscriber lagged behind post updates");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of `recv`; `None` when nothing is pending
    pub fn try_recv(&mut self) -> Option<PostsUpdate> {
        loop {
            match self.receiver.try_recv() {
                Ok(update) => return Some(update),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
