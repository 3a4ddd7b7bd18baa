//! Filesystem-backed image storage

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};

use crate::media::ImageKind;
use crate::naming::derive_filename;

/// How many timestamp bumps to try when a derived filename is already taken
const MAX_NAME_ATTEMPTS: i64 = 8;

/// Errors that can occur while storing an uploaded image.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("Invalid mime type: {0}")]
    InvalidMimeType(String),
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("invalid stored filename")]
    InvalidFilename,
    #[error("could not allocate a unique filename")]
    NameExhausted,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result of storing an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Bare filename under the storage root
    pub filename: String,
}

/// Image storage rooted at a local directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate the declared media type and write the payload to disk.
    ///
    /// The media type is checked before anything touches the filesystem, so a
    /// rejected upload never leaves a file behind.
    pub async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredImage, ImageStoreError> {
        let kind = ImageKind::from_mime(content_type)
            .ok_or_else(|| ImageStoreError::InvalidMimeType(content_type.to_string()))?;

        if data.is_empty() {
            return Err(ImageStoreError::EmptyPayload);
        }

        let now_ms = chrono::Utc::now().timestamp_millis();
        let (filename, mut file) = self.create_unique(original_name, kind, now_ms).await?;

        if let Err(err) = write_all(&mut file, &data).await {
            drop(file);
            let _ = fs::remove_file(self.root.join(&filename)).await;
            return Err(err.into());
        }

        tracing::info!(
            filename = %filename,
            size_bytes = data.len(),
            mime = kind.mime(),
            "Stored uploaded image"
        );

        Ok(StoredImage { filename })
    }

    /// Open a fresh file, bumping the timestamp if two uploads of the same
    /// name land in the same millisecond.
    async fn create_unique(
        &self,
        original_name: &str,
        kind: ImageKind,
        now_ms: i64,
    ) -> Result<(String, fs::File), ImageStoreError> {
        for offset in 0..MAX_NAME_ATTEMPTS {
            let filename = derive_filename(original_name, kind, now_ms + offset);
            let path = self.root.join(&filename);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((filename, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(ImageStoreError::NameExhausted)
    }

    /// Absolute path of a stored file. Rejects anything that is not a bare filename.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, ImageStoreError> {
        if filename.is_empty()
            || filename.contains(|c| c == '/' || c == '\\')
            || filename == "."
            || filename == ".."
        {
            return Err(ImageStoreError::InvalidFilename);
        }
        Ok(self.root.join(filename))
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}
