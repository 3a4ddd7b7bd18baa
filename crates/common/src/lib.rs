//! Shared configuration, error handling, and extractors for Postboard
//!
//! This crate provides common functionality used across the Postboard workspace:
//! - Configuration management following 12-factor principles
//! - The HTTP-mapped error type shared by every handler
//! - Axum extractors for pagination, validated JSON, and request origin

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, LogFormat};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{PageQuery, PageWindow, RequestOrigin, ValidatedJson};
