//! Accepted image media types

/// Image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Resolve a declared media type against the allow-list.
    ///
    /// Matching ignores case and any `;`-separated parameters. Both
    /// `image/jpeg` and the non-standard `image/jpg` map to JPEG.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();

        if essence.eq_ignore_ascii_case("image/png") {
            Some(ImageKind::Png)
        } else if essence.eq_ignore_ascii_case("image/jpeg")
            || essence.eq_ignore_ascii_case("image/jpg")
        {
            Some(ImageKind::Jpeg)
        } else {
            None
        }
    }

    /// File extension written to disk
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
        }
    }

    /// Canonical media type, used when serving the file back
    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}
