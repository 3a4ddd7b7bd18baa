//! Posts domain: post listing with pagination, image-backed create/update,
//! and the post store

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{parse_post_id, NewPost, Post, PostUpdate};

// Re-export repository types
pub use repository::{InMemoryPostStore, PgPostRepository, PostStore};

// Re-export API types
pub use api::routes;
pub use api::PostsState;
