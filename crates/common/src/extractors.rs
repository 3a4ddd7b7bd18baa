//! Custom axum extractors for Postboard

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header::HOST, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use crate::Error;

/// Header set by reverse proxies to carry the client-facing scheme
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Pagination query parameters for the post listing (`?pagesize=2&page=1`)
///
/// Both values arrive as raw strings so that malformed input degrades to
/// "no pagination" instead of a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub pagesize: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

/// A resolved skip/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: i64,
    pub limit: i64,
}

impl PageQuery {
    /// Page size, if present and positive. Zero, negative, or unparseable
    /// values count as absent.
    pub fn page_size(&self) -> Option<i64> {
        parse_int(self.pagesize.as_deref()).filter(|size| *size > 0)
    }

    /// 1-based page number, if present and parseable
    pub fn page(&self) -> Option<i64> {
        parse_int(self.page.as_deref())
    }

    /// The window to apply, or `None` when the whole collection is requested.
    ///
    /// Paging only applies when both a non-zero page size and a page are
    /// given; a page size of 0 falls back to the full list. Pages below 1
    /// are treated as page 1.
    pub fn window(&self) -> Option<PageWindow> {
        let limit = self.page_size()?;
        let page = self.page()?.max(1);

        Some(PageWindow {
            skip: limit.saturating_mul(page - 1),
            limit,
        })
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}

/// Protocol and host of the live request, used to build absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub protocol: String,
    pub host: String,
}

impl RequestOrigin {
    /// `<protocol>://<host>`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.host)
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let protocol = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::Validation("Missing Host header".to_string()))?;

        Ok(RequestOrigin { protocol, host })
    }
}

/// JSON extractor that validates the deserialized value automatically.
///
/// Replaces `Json<T>` + manual `.validate()` calls in handlers.
/// Requires `T: DeserializeOwned + Validate`.
///
/// All input errors (deserialization + validation) return 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Rejection type for `ValidatedJson`:
/// - JSON deserialization errors → 400 (via `Error::Validation`)
/// - Bodies over the configured limit → 413 (via `Error::PayloadTooLarge`)
/// - Validation errors → 400 (via `Error::Validation`)
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Validation(Error),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            ValidatedJsonRejection::Json(e) => {
                Error::from_rejection(e.status(), e.body_text()).into_response()
            }
            ValidatedJsonRejection::Validation(e) => e.into_response(),
        }
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(|e| {
            ValidatedJsonRejection::Validation(Error::Validation(format!(
                "Validation failed: {}",
                e
            )))
        })?;
        Ok(ValidatedJson(value))
    }
}
