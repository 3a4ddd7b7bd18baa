//! Image upload handling for Postboard
//!
//! Validates an inbound image's declared media type against a fixed
//! allow-list, derives a collision-resistant filename, writes the bytes to
//! a local directory, and builds the public URL the image is served from.

mod media;
mod naming;
mod store;

pub use media::ImageKind;
pub use naming::{derive_filename, public_url, IMAGES_ROUTE};
pub use store::{ImageStore, ImageStoreError, StoredImage};
