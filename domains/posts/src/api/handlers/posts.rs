//! Post API handlers
//!
//! Implements:
//! - GET    /api/posts       - List posts, optionally paginated
//! - GET    /api/posts/{id}  - Fetch one post
//! - POST   /api/posts       - Create a post with an image (auth required)
//! - PUT    /api/posts/{id}  - Replace a post owned by the caller
//! - DELETE /api/posts/{id}  - Delete a post by id (auth required)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use postboard_auth::{AuthUser, MaybeAuthUser};
use postboard_common::{Error, PageQuery, RequestOrigin, Result};
use postboard_storage::{public_url, ImageStoreError};
use serde::Serialize;
use uuid::Uuid;

use crate::api::middleware::PostsState;
use crate::api::submission::{ImageUpload, PostSubmission};
use crate::domain::entities::{parse_post_id, NewPost, Post, PostUpdate};

/// Body for responses that carry only a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for `GET /api/posts`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub message: &'static str,
    pub posts: Vec<Post>,
    /// Size of the whole collection, not of the returned page
    pub max_posts: i64,
}

/// Response for `GET /api/posts/{id}`
#[derive(Debug, Serialize)]
pub struct PostEnvelope {
    pub message: &'static str,
    pub post: Post,
}

/// The created record as echoed back by `POST /api/posts`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
}

/// Response for `POST /api/posts`
#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub message: &'static str,
    pub post: CreatedPost,
}

/// GET /api/posts - list posts with the total collection size
///
/// `?pagesize=N&page=P` restricts the listing to one page; a missing or
/// zero page size returns everything.
pub async fn list_posts(
    State(state): State<PostsState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>> {
    let window = query.window();
    let posts = state.posts.list(window).await?;
    let max_posts = state.posts.count().await?;

    tracing::debug!(
        returned = posts.len(),
        max_posts,
        paginated = window.is_some(),
        "Listed posts"
    );

    Ok(Json(PostListResponse {
        message: "Posts fetched successfully!",
        posts,
        max_posts,
    }))
}

/// GET /api/posts/{id} - fetch a single post
pub async fn get_post(
    State(state): State<PostsState>,
    Path(id): Path<String>,
) -> Result<Json<PostEnvelope>> {
    let post = match parse_post_id(&id) {
        Some(id) => state.posts.find(id).await?,
        None => None,
    }
    .ok_or_else(|| Error::NotFound("Post not found!".to_string()))?;

    Ok(Json(PostEnvelope {
        message: "Single Post fetched successfully!",
        post,
    }))
}

/// POST /api/posts - create a post owned by the caller
pub async fn create_post(
    AuthUser(identity): AuthUser,
    State(state): State<PostsState>,
    origin: RequestOrigin,
    submission: PostSubmission,
) -> Result<(StatusCode, Json<CreatePostResponse>)> {
    submission.check()?;

    let image = submission
        .image
        .ok_or_else(|| Error::Validation("An image file is required".to_string()))?;
    let image_path = store_image(&state, &origin, image).await?;

    let created = state
        .posts
        .create(NewPost {
            title: submission.title,
            content: submission.content,
            image_path: Some(image_path),
            creator: identity.user_id,
        })
        .await?;

    tracing::info!(post_id = %created.id, creator = %created.creator, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post added successfully",
            post: CreatedPost {
                id: created.id,
                title: created.title,
                content: created.content,
                image_path: created.image_path,
            },
        }),
    ))
}

/// PUT /api/posts/{id} - replace a post owned by the caller
///
/// The match is on id *and* creator. When nothing matches (wrong owner, no
/// credential, unknown id) the response is still 200; only the log records
/// that no post changed.
pub async fn update_post(
    MaybeAuthUser(identity): MaybeAuthUser,
    State(state): State<PostsState>,
    origin: RequestOrigin,
    Path(id): Path<String>,
    submission: PostSubmission,
) -> Result<Json<MessageResponse>> {
    submission.check()?;

    let image_path = match submission.image {
        Some(image) => Some(store_image(&state, &origin, image).await?),
        None => submission.image_path,
    };

    let update = PostUpdate {
        title: submission.title,
        content: submission.content,
        image_path,
    };

    let matched = match (parse_post_id(&id), identity.as_ref()) {
        (Some(post_id), Some(identity)) => {
            state
                .posts
                .update_owned(post_id, identity.user_id, update)
                .await?
        }
        _ => 0,
    };

    if matched == 0 {
        tracing::warn!(
            post_id = %id,
            caller = ?identity.as_ref().map(|i| i.user_id),
            "Update matched no post owned by the caller"
        );
    } else {
        tracing::info!(post_id = %id, "Post updated");
    }

    Ok(Json(MessageResponse {
        message: "Post updated successfully",
    }))
}

/// DELETE /api/posts/{id} - delete by id
///
/// Requires a valid credential but does not check ownership, and reports
/// success whether or not a record was removed.
pub async fn delete_post(
    AuthUser(identity): AuthUser,
    State(state): State<PostsState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let deleted = match parse_post_id(&id) {
        Some(post_id) => state.posts.delete(post_id).await?,
        None => 0,
    };

    tracing::info!(post_id = %id, caller = %identity.user_id, deleted, "Post delete requested");

    Ok(Json(MessageResponse {
        message: "Post deleted!",
    }))
}

/// Validate and write an uploaded image, returning its absolute URL
async fn store_image(
    state: &PostsState,
    origin: &RequestOrigin,
    image: ImageUpload,
) -> Result<String> {
    let stored = state
        .images
        .store(&image.file_name, &image.content_type, image.data)
        .await
        .map_err(upload_error)?;

    Ok(public_url(&origin.base_url(), &stored.filename))
}

fn upload_error(err: ImageStoreError) -> Error {
    match err {
        ImageStoreError::InvalidMimeType(mime) => {
            tracing::debug!(mime = %mime, "Rejected upload with disallowed media type");
            Error::Validation("Invalid mime type".to_string())
        }
        ImageStoreError::EmptyPayload => {
            Error::Validation("Uploaded file is empty".to_string())
        }
        ImageStoreError::InvalidFilename => Error::Validation("Invalid file name".to_string()),
        err @ (ImageStoreError::NameExhausted | ImageStoreError::Io(_)) => {
            Error::Internal(format!("Failed to store uploaded image: {}", err))
        }
    }
}
