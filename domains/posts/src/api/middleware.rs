//! Posts domain state and auth gate integration

use std::sync::Arc;

use axum::extract::FromRef;
use postboard_auth::AuthGate;
use postboard_storage::ImageStore;

use crate::repository::PostStore;

/// Application state for the Posts domain
#[derive(Clone)]
pub struct PostsState {
    pub posts: Arc<dyn PostStore>,
    pub images: ImageStore,
    pub auth: AuthGate,
}

impl FromRef<PostsState> for AuthGate {
    fn from_ref(state: &PostsState) -> Self {
        state.auth.clone()
    }
}
