//! Wire and local shapes for posts and accounts

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A post as the API serializes it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
}

/// A post as views consume it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
    pub creator: Option<String>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            image_path: record.image_path,
            creator: record.creator,
        }
    }
}

/// Value published to subscribers after each list fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsUpdate {
    pub posts: Vec<Post>,
    /// Total posts on the server, not just this page
    pub post_count: i64,
}

/// The echo returned when a post is created
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
}

/// An image file to upload
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ImageAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Image for an update: a new upload, or the URL already on the post
#[derive(Debug, Clone)]
pub enum PostImage {
    Upload(ImageAttachment),
    Existing(Option<String>),
}

/// Result of a signup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

// Response envelopes

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse {
    pub posts: Vec<PostRecord>,
    pub max_posts: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SingleResponse {
    pub post: PostRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateResponse {
    pub post: CreatedPost,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignupResponse {
    pub result: SignupResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user_id: String,
}

/// JSON body for an update without a new image
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateBody<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub image_path: Option<&'a str>,
}
