//! Users domain: account signup, credential login, and the user store

pub mod api;
pub mod domain;
pub mod repository;

pub use domain::entities::{NewUser, User};
pub use domain::password::{hash_password, verify_password};

pub use repository::{InMemoryUserStore, PgUserRepository, UserStore};

pub use api::routes;
pub use api::UsersState;
