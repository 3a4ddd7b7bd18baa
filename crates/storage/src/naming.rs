//! Stored filename derivation and public URLs

use crate::media::ImageKind;

/// Route prefix images are served under
pub const IMAGES_ROUTE: &str = "/images";

/// Fallback stem when the original name has nothing usable
const DEFAULT_STEM: &str = "image";

/// Derive the stored filename: `<stem>-<timestamp_ms>.<ext>`.
///
/// The stem is the original name without directories or extension,
/// lower-cased, with each space replaced by a hyphen. The extension always
/// comes from the resolved media type, never from the client's name.
pub fn derive_filename(original_name: &str, kind: ImageKind, timestamp_ms: i64) -> String {
    let base = original_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };

    let stem = stem.trim_start_matches('.').to_lowercase().replace(' ', "-");
    let stem = if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    };

    format!("{}-{}.{}", stem, timestamp_ms, kind.extension())
}

/// Absolute URL for a stored image given the request's `<proto>://<host>`
pub fn public_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}{}/{}",
        base_url.trim_end_matches('/'),
        IMAGES_ROUTE,
        filename
    )
}
