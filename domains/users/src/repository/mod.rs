//! User store implementations for the Users domain

pub mod memory;
pub mod users;

use async_trait::async_trait;
use postboard_common::Result;

use crate::domain::entities::{NewUser, User};

pub use memory::InMemoryUserStore;
pub use users::PgUserRepository;

/// Registered accounts keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register an account. Fails with `Error::Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User>;

    /// Look up an account by its normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
