//! Postboard application composition root
//!
//! Composes the domain routers, static image serving, and the shared HTTP
//! layers into a single application.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use postboard_auth::{AuthConfig, AuthGate};
use postboard_common::{Config, Error};
use postboard_posts::{PgPostRepository, PostStore, PostsState};
use postboard_storage::{ImageStore, IMAGES_ROUTE};
use postboard_users::{PgUserRepository, UserStore, UsersState};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
};

/// Everything the routers need, independent of where it is stored
#[derive(Clone)]
pub struct AppServices {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub images: ImageStore,
    pub auth: AuthGate,
}

/// Build the auth gate from application configuration
pub fn auth_gate(config: &Config) -> AuthGate {
    AuthGate::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
        token_ttl_secs: config.token_ttl_secs,
    })
}

/// Create the main application router backed by PostgreSQL.
///
/// Applies pending migrations before returning.
pub async fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let images = ImageStore::new(&config.images_dir)?;
    tracing::info!(dir = %images.root().display(), "Image directory ready");

    let services = AppServices {
        posts: Arc::new(PgPostRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool)),
        images,
        auth: auth_gate(config),
    };

    Ok(build_router(services, config.max_upload_bytes))
}

/// Compose domain routes, static images, and the body limit.
///
/// Over-limit bodies are answered with the usual JSON error envelope.
/// Tracing and CORS are layered on by the binary so tests can drive the
/// bare router.
pub fn build_router(services: AppServices, max_upload_bytes: usize) -> Router {
    let posts_state = PostsState {
        posts: services.posts,
        images: services.images.clone(),
        auth: services.auth.clone(),
    };
    let users_state = UsersState {
        users: services.users,
        auth: services.auth,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(postboard_posts::routes().with_state(posts_state))
        .merge(postboard_users::routes().with_state(users_state))
        .nest_service(IMAGES_ROUTE, ServeDir::new(services.images.root()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(middleware::map_response(payload_too_large_envelope))
}

/// Rewrite the limit layer's plain-text 413 into `{message, code}`
async fn payload_too_large_envelope(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));

    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json {
        return response;
    }

    tracing::debug!("Rejected request body over the configured limit");
    Error::PayloadTooLarge("Request body is too large".to_string()).into_response()
}

/// CORS for the browser client.
///
/// `None` allows any origin; otherwise a comma-separated origin list.
pub fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let Some(origins) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
