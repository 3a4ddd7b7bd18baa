//! Post body extractor accepting either multipart form data or JSON
//!
//! Clients send multipart when an image is attached and JSON otherwise.
//! Image bytes are buffered here and only written to disk by the handler,
//! after every other check has passed.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use postboard_common::Error;
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::validate_title;

/// Multipart field carrying the image file
const IMAGE_FIELD: &str = "image";

/// An image attached to a submission, not yet validated or stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Title, content, and optional image for create/update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostSubmission {
    /// Echo of the record id some clients send on update; the path id wins
    #[serde(default)]
    pub id: Option<String>,
    #[validate(custom(function = "validate_title"))]
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Existing image URL, kept when no replacement image is attached
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl PostSubmission {
    /// Run field validation, mapping failures to a 400
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut submission = PostSubmission::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                if submission.image.is_some() {
                    return Err(Error::Validation(
                        "Only a single image may be uploaded".to_string(),
                    ));
                }

                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_default();
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(multipart_error)?;

                submission.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            match name.as_str() {
                "id" => submission.id = Some(value),
                "title" => submission.title = value,
                "content" => submission.content = value,
                "imagePath" => {
                    submission.image_path = Some(value).filter(|v| !v.trim().is_empty())
                }
                _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        Ok(submission)
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> Error {
    tracing::debug!(error = %err, "Failed to read multipart payload");
    Error::from_rejection(err.status(), err.body_text())
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for PostSubmission
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| Error::from_rejection(e.status(), e.body_text()))?;
            return PostSubmission::from_multipart(multipart).await;
        }

        let Json(submission) = Json::<PostSubmission>::from_request(req, state)
            .await
            .map_err(|e| Error::from_rejection(e.status(), e.body_text()))?;
        Ok(submission)
    }
}
