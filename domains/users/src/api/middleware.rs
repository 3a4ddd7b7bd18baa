//! Users domain state

use std::sync::Arc;

use axum::extract::FromRef;
use postboard_auth::AuthGate;

use crate::repository::UserStore;

/// Application state for the Users domain
#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<dyn UserStore>,
    pub auth: AuthGate,
}

impl FromRef<UsersState> for AuthGate {
    fn from_ref(state: &UsersState) -> Self {
        state.auth.clone()
    }
}
