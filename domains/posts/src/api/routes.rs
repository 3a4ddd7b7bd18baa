//! Route definitions for Posts domain API

use axum::{routing::get, Router};

use super::handlers::posts;
use super::middleware::PostsState;

/// Base path all post routes are mounted under
pub const POSTS_BASE_PATH: &str = "/api/posts";

/// Create all Posts domain API routes
pub fn routes() -> Router<PostsState> {
    Router::new()
        .route(
            POSTS_BASE_PATH,
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
}
