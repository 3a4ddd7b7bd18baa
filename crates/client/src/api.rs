//! HTTP plumbing: base URL, bearer session, response decoding

use std::sync::Arc;

use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{ClientError, Result};
use crate::models::{LoginResponse, SignupResponse, SignupResult};

/// Credentials held after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    session: Arc<RwLock<Option<Session>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("postboard-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let mut base =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{base_url} cannot be a base URL")));
        }
        // Relative joins replace the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self {
            http,
            base,
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// Builder for `path`, carrying the bearer token when logged in
    pub async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(session) = self.session.read().await.as_ref() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", session.token));
        }
        Ok(builder)
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// POST /api/user/signup
    pub async fn signup(&self, email: &str, password: &str) -> Result<SignupResult> {
        let response = self
            .request(Method::POST, "api/user/signup")
            .await?
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: SignupResponse = Self::handle(response).await?;
        Ok(body.result)
    }

    /// POST /api/user/login, keeping the issued token for later requests
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .request(Method::POST, "api/user/login")
            .await?
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: LoginResponse = Self::handle(response).await?;
        let session = Session {
            token: body.token,
            user_id: body.user_id,
            expires_in: body.expires_in,
        };
        *self.session.write().await = Some(session.clone());

        tracing::debug!(user_id = %session.user_id, "Logged in");
        Ok(session)
    }

    pub async fn logout(&self) {
        self.session.write().await.take();
    }

    /// Decode a JSON body, mapping non-success statuses to `ClientError::Api`
    pub async fn handle<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Like `handle` for responses whose body carries only a message
    pub async fn handle_unit(response: Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await?;
            return Err(api_error(status.as_u16(), &bytes));
        }
        Ok(())
    }
}

fn api_error(status: u16, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    ClientError::Api { status, message }
}
