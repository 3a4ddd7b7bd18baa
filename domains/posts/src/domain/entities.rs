//! Post entity and write models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationError;

/// A stored post.
///
/// Serialized with the store's field names (`_id`, `imagePath`) so clients
/// see the same shape from every endpoint that returns full records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
    /// Set from the resolved identity at creation; never rewritten
    pub creator: Uuid,
}

/// Fields for a post about to be created. The store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
    pub creator: Uuid,
}

/// Replacement fields for an existing post. `creator` is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
}

impl Post {
    /// Materialize a new post under a store-assigned identifier
    pub fn from_new(id: Uuid, new: NewPost) -> Self {
        Self {
            id,
            title: new.title,
            content: new.content,
            image_path: new.image_path,
            creator: new.creator,
        }
    }

    /// Replace the mutable fields in place
    pub fn apply(&mut self, update: PostUpdate) {
        self.title = update.title;
        self.content = update.content;
        self.image_path = update.image_path;
    }
}

/// Parse a path identifier. Anything that is not a valid id can never match
/// a stored post, so callers treat `None` as "no such record".
pub fn parse_post_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Titles must contain something other than whitespace
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("blank_title");
        err.message = Some("Title must not be empty".into());
        return Err(err);
    }
    Ok(())
}
