//! Client for the post API
//!
//! `PostsService` issues the HTTP calls and republishes fetched post lists
//! through a `PostsState` container that views subscribe to.

pub mod api;
pub mod error;
pub mod models;
pub mod navigator;
pub mod service;
pub mod state;

pub use api::{ApiClient, Session};
pub use error::{ClientError, Result};
pub use models::{
    CreatedPost, ImageAttachment, Post, PostImage, PostRecord, PostsUpdate, SignupResult,
};
pub use navigator::{Navigator, NoopNavigator, LIST_ROUTE};
pub use service::{PendingDelete, PostsService};
pub use state::{PostsState, Subscription};
