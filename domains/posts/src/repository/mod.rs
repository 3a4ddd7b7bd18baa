//! Post store implementations for the Posts domain

pub mod memory;
pub mod posts;

use async_trait::async_trait;
use postboard_common::{PageWindow, Result};
use uuid::Uuid;

use crate::domain::entities::{NewPost, Post, PostUpdate};

pub use memory::InMemoryPostStore;
pub use posts::PgPostRepository;

/// Collection of posts keyed by identifier.
///
/// Every call is a single independent statement; there are no transactions
/// spanning multiple records.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post under a freshly assigned identifier
    async fn create(&self, post: NewPost) -> Result<Post>;

    /// Find a post by identifier
    async fn find(&self, id: Uuid) -> Result<Option<Post>>;

    /// Posts in insertion order, restricted to `window` when given
    async fn list(&self, window: Option<PageWindow>) -> Result<Vec<Post>>;

    /// Total number of posts, independent of any window
    async fn count(&self) -> Result<i64>;

    /// Replace the mutable fields of the post matching both `id` and
    /// `creator`. Returns the number of records matched (0 or 1).
    async fn update_owned(&self, id: Uuid, creator: Uuid, update: PostUpdate) -> Result<u64>;

    /// Delete by identifier alone. Returns the number of records removed.
    async fn delete(&self, id: Uuid) -> Result<u64>;
}
