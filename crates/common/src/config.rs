//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default lifetime of issued tokens (one hour)
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Default request body limit (10 MiB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Token signing and validation
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub token_ttl_secs: u64,

    /// Image uploads
    pub images_dir: PathBuf,
    pub max_upload_bytes: usize,

    /// HTTP
    pub cors_allowed_origins: Option<String>,
    pub port: u16,

    /// Runtime configuration
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok(),
            jwt_audience: env::var("JWT_AUDIENCE").ok(),
            token_ttl_secs: parse_or(env::var("TOKEN_TTL_SECS").ok(), DEFAULT_TOKEN_TTL_SECS),

            images_dir: env::var("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("backend/images")),
            max_upload_bytes: parse_or(
                env::var("MAX_UPLOAD_BYTES").ok(),
                DEFAULT_MAX_UPLOAD_BYTES,
            ),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .filter(|origins| !origins.trim().is_empty()),
            port: parse_or(env::var("PORT").ok(), 3000),

            log_format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
        };

        if config.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        Ok(config)
    }
}

/// Parse an optional raw value, falling back to `default` when missing or malformed
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
