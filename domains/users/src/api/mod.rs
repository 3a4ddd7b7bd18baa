//! API layer for the Users domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::UsersState;
pub use routes::routes;
