//! API layer for the Posts domain
//!
//! Contains HTTP handlers, the post body extractor, routes, and domain state.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod submission;

pub use middleware::PostsState;
pub use routes::routes;
